#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Store connection, listing queries, and incident mutations for the crime
//! API.
//!
//! Uses `switchy_database` with the `SQLite` backend. Every statement is
//! issued through `query_raw_params()` / `exec_raw_params()` with bound
//! [`switchy_database::DatabaseValue`]s; request values never reach the SQL
//! text.

pub mod db;
pub mod mutations;
pub mod queries;

use switchy_database::Database;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// The store could not be opened.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of what went wrong.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Outcome of a rejected incident insert or delete.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// An incident with this case number is already stored.
    #[error("Incident {case_number} already exists")]
    Conflict {
        /// The duplicate case number.
        case_number: String,
    },

    /// No incident with this case number is stored.
    #[error("Incident {case_number} does not exist")]
    NotFound {
        /// The missing case number.
        case_number: String,
    },

    /// The store itself failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Creates the `codes`, `neighborhoods`, and `incidents` tables if they
/// don't already exist, plus the unique index that guards case numbers.
///
/// Safe to run against an already-populated store.
///
/// # Errors
///
/// Returns [`DbError`] if any statement fails.
pub async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS codes (
            code          INTEGER PRIMARY KEY,
            incident_type TEXT
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS neighborhoods (
            neighborhood_number INTEGER PRIMARY KEY,
            neighborhood_name   TEXT
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS incidents (
            case_number         TEXT PRIMARY KEY,
            date_time           TEXT NOT NULL,
            code                INTEGER,
            incident            TEXT,
            police_grid         INTEGER,
            neighborhood_number INTEGER,
            block               TEXT
        )",
    )
    .await?;

    // Stores provisioned elsewhere may lack the primary key on case_number.
    db.exec_raw(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_incidents_case_number
         ON incidents (case_number)",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_incidents_date_time
         ON incidents (date_time)",
    )
    .await?;

    log::info!("Database schema verified");
    Ok(())
}
