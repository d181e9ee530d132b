//! Single-row incident inserts and deletes.
//!
//! Each mutation is one statement, so the existence check and the write
//! cannot interleave with a concurrent request for the same case number.
//! The unique constraint on `incidents.case_number` is the authoritative
//! guard: an insert that hits it affects zero rows (or, under a race the
//! store reports as an error, fails with a constraint violation) and is
//! reported as [`MutationError::Conflict`].

use crime_api_crime_models::Incident;
use switchy_database::{Database, DatabaseValue};

use crate::{DbError, MutationError};

/// Inserts a new incident.
///
/// # Errors
///
/// * [`MutationError::Conflict`] if an incident with the same case number
///   is already stored; the store is left unchanged.
/// * [`MutationError::Db`] if the database operation fails.
pub async fn insert_incident(db: &dyn Database, incident: &Incident) -> Result<(), MutationError> {
    let result = db
        .exec_raw_params(
            "INSERT INTO incidents (
                case_number, date_time, code, incident,
                police_grid, neighborhood_number, block
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (case_number) DO NOTHING",
            &[
                DatabaseValue::String(incident.case_number.clone()),
                DatabaseValue::String(incident.stored_date_time()),
                DatabaseValue::Int64(incident.code),
                DatabaseValue::String(incident.incident.clone()),
                DatabaseValue::Int64(incident.police_grid),
                DatabaseValue::Int64(incident.neighborhood_number),
                DatabaseValue::String(incident.block.clone()),
            ],
        )
        .await;

    match result {
        Ok(0) => Err(MutationError::Conflict {
            case_number: incident.case_number.clone(),
        }),
        Ok(_) => {
            log::debug!("Inserted incident {}", incident.case_number);
            Ok(())
        }
        Err(e) if is_unique_violation(&e) => Err(MutationError::Conflict {
            case_number: incident.case_number.clone(),
        }),
        Err(e) => Err(MutationError::Db(DbError::Database(e))),
    }
}

/// Deletes the incident with the given case number.
///
/// # Errors
///
/// * [`MutationError::NotFound`] if no incident has that case number; the
///   store is left unchanged.
/// * [`MutationError::Db`] if the database operation fails.
pub async fn delete_incident(db: &dyn Database, case_number: &str) -> Result<(), MutationError> {
    let deleted = db
        .exec_raw_params(
            "DELETE FROM incidents WHERE case_number = $1",
            &[DatabaseValue::String(case_number.to_string())],
        )
        .await
        .map_err(DbError::from)?;

    if deleted == 0 {
        return Err(MutationError::NotFound {
            case_number: case_number.to_string(),
        });
    }

    log::debug!("Deleted incident {case_number}");
    Ok(())
}

/// Returns `true` if the store rejected a write because of a unique or
/// primary-key constraint.
fn is_unique_violation(error: &switchy_database::DatabaseError) -> bool {
    let message = error.to_string();
    message.contains("UNIQUE constraint failed") || message.contains("duplicate key value")
}
