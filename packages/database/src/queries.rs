//! Listing queries for codes, neighborhoods, and incidents.
//!
//! Each listing is compiled from its typed filter into a [`CompiledQuery`]
//! (SQL text with `$n` placeholders plus the values bound to them) and then
//! executed. Compilation is pure, so the exact SQL can be inspected without
//! a store.
//!
//! Predicates from distinct parameters are joined with `AND`; the values of
//! one list parameter become a single `IN (...)` membership test. Absent
//! parameters contribute no predicate at all.

use crime_api_crime_models::{DATE_FORMAT, Incident, IncidentCode, Neighborhood, parse_date_time};
use crime_api_database_models::{CodeQuery, IncidentQuery, NeighborhoodQuery};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Columns selected for every incident listing.
const INCIDENT_COLUMNS: &str =
    "case_number, date_time, code, incident, police_grid, neighborhood_number, block";

/// A parameterized statement ready to hand to the store.
#[derive(Debug)]
pub struct CompiledQuery {
    /// SQL text with `$1..$n` placeholders.
    pub sql: String,
    /// Values bound to the placeholders, in order.
    pub params: Vec<DatabaseValue>,
}

/// Accumulates `WHERE` conditions and their bound values.
#[derive(Default)]
struct Predicate {
    conditions: Vec<String>,
    params: Vec<DatabaseValue>,
}

impl Predicate {
    /// Registers a bound value and returns its placeholder.
    fn bind(&mut self, value: DatabaseValue) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn push_compare(&mut self, lhs: &str, op: &str, value: DatabaseValue) {
        let placeholder = self.bind(value);
        self.conditions.push(format!("{lhs} {op} {placeholder}"));
    }

    /// Adds `column IN (...)` for the given values. An empty list can match
    /// nothing, which SQL can't express with `IN ()`.
    fn push_membership(&mut self, column: &str, values: Option<&[i64]>) {
        let Some(values) = values else {
            return;
        };

        if values.is_empty() {
            self.conditions.push("0 = 1".to_string());
            return;
        }

        let placeholders: Vec<String> = values
            .iter()
            .map(|v| self.bind(DatabaseValue::Int64(*v)))
            .collect();
        self.conditions
            .push(format!("{column} IN ({})", placeholders.join(", ")));
    }

    /// Renders ` WHERE a AND b ...`, or nothing when no predicate is active.
    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// Compiles the code listing: optional membership on `code`, ascending by
/// code.
#[must_use]
pub fn compile_codes(query: &CodeQuery) -> CompiledQuery {
    let mut predicate = Predicate::default();
    predicate.push_membership("code", query.codes.as_deref());

    CompiledQuery {
        sql: format!(
            "SELECT code, incident_type FROM codes{} ORDER BY code ASC",
            predicate.where_clause()
        ),
        params: predicate.params,
    }
}

/// Compiles the neighborhood listing: optional membership on the
/// neighborhood number, ascending by number.
#[must_use]
pub fn compile_neighborhoods(query: &NeighborhoodQuery) -> CompiledQuery {
    let mut predicate = Predicate::default();
    predicate.push_membership("neighborhood_number", query.ids.as_deref());

    CompiledQuery {
        sql: format!(
            "SELECT neighborhood_number, neighborhood_name FROM neighborhoods{} \
             ORDER BY neighborhood_number ASC",
            predicate.where_clause()
        ),
        params: predicate.params,
    }
}

/// Compiles the incident listing.
///
/// The inner select keeps the `limit` most recent rows of the filtered set
/// (`date_time DESC, case_number DESC`); the outer select presents them in
/// ascending `(date_time, case_number)` order. The two orderings are exact
/// reverses, so rows sharing a timestamp are always cut and presented by
/// case number.
#[must_use]
pub fn compile_incidents(query: &IncidentQuery) -> CompiledQuery {
    let mut predicate = Predicate::default();

    if let Some(start) = query.start_date {
        predicate.push_compare(
            "date(date_time)",
            ">=",
            DatabaseValue::String(start.format(DATE_FORMAT).to_string()),
        );
    }

    if let Some(end) = query.end_date {
        predicate.push_compare(
            "date(date_time)",
            "<=",
            DatabaseValue::String(end.format(DATE_FORMAT).to_string()),
        );
    }

    predicate.push_membership("code", query.codes.as_deref());
    predicate.push_membership("police_grid", query.grids.as_deref());
    predicate.push_membership("neighborhood_number", query.neighborhoods.as_deref());

    let where_clause = predicate.where_clause();
    let limit = predicate.bind(DatabaseValue::Int64(i64::from(query.limit)));

    CompiledQuery {
        sql: format!(
            "SELECT {INCIDENT_COLUMNS} FROM (\
                SELECT {INCIDENT_COLUMNS} FROM incidents{where_clause} \
                ORDER BY date_time DESC, case_number DESC LIMIT {limit}\
             ) AS recent \
             ORDER BY date_time ASC, case_number ASC"
        ),
        params: predicate.params,
    }
}

/// Lists incident codes matching the filter.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn query_codes(
    db: &dyn Database,
    query: &CodeQuery,
) -> Result<Vec<IncidentCode>, DbError> {
    let compiled = compile_codes(query);
    let rows = db.query_raw_params(&compiled.sql, &compiled.params).await?;

    let mut codes = Vec::with_capacity(rows.len());
    for row in &rows {
        let incident_type: Option<String> = row.to_value("incident_type").unwrap_or(None);
        let code: i64 = row.to_value("code").map_err(|e| missing_column("code", e))?;
        codes.push(IncidentCode {
            code,
            incident_type: incident_type.unwrap_or_default(),
        });
    }

    Ok(codes)
}

/// Lists neighborhoods matching the filter.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn query_neighborhoods(
    db: &dyn Database,
    query: &NeighborhoodQuery,
) -> Result<Vec<Neighborhood>, DbError> {
    let compiled = compile_neighborhoods(query);
    let rows = db.query_raw_params(&compiled.sql, &compiled.params).await?;

    let mut neighborhoods = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: Option<String> = row.to_value("neighborhood_name").unwrap_or(None);
        let id: i64 = row
            .to_value("neighborhood_number")
            .map_err(|e| missing_column("neighborhood_number", e))?;
        neighborhoods.push(Neighborhood {
            id,
            name: name.unwrap_or_default(),
        });
    }

    Ok(neighborhoods)
}

/// Lists the most recent incidents matching the filter, oldest first.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails or a stored
/// timestamp cannot be parsed.
pub async fn query_incidents(
    db: &dyn Database,
    query: &IncidentQuery,
) -> Result<Vec<Incident>, DbError> {
    let compiled = compile_incidents(query);
    log::trace!("query_incidents: {}", compiled.sql);
    let rows = db.query_raw_params(&compiled.sql, &compiled.params).await?;

    let mut incidents = Vec::with_capacity(rows.len());
    for row in &rows {
        let case_number: String = row
            .to_value("case_number")
            .map_err(|e| missing_column("case_number", e))?;
        let date_time: String = row
            .to_value("date_time")
            .map_err(|e| missing_column("date_time", e))?;
        let occurred_at = parse_date_time(&date_time).map_err(|e| DbError::Conversion {
            message: format!("Incident {case_number}: {e}"),
        })?;

        let incident: Option<String> = row.to_value("incident").unwrap_or(None);
        let block: Option<String> = row.to_value("block").unwrap_or(None);
        let code: Option<i64> = row.to_value("code").unwrap_or(None);
        let police_grid: Option<i64> = row.to_value("police_grid").unwrap_or(None);
        let neighborhood_number: Option<i64> =
            row.to_value("neighborhood_number").unwrap_or(None);

        incidents.push(Incident {
            case_number,
            occurred_at,
            code: code.unwrap_or_default(),
            incident: incident.unwrap_or_default(),
            police_grid: police_grid.unwrap_or_default(),
            neighborhood_number: neighborhood_number.unwrap_or_default(),
            block: block.unwrap_or_default(),
        });
    }

    Ok(incidents)
}

fn missing_column(column: &str, e: impl std::fmt::Display) -> DbError {
    DbError::Conversion {
        message: format!("Failed to read column {column}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::insert_incident;
    use crate::test_support::{incident, open_test_db, seed_codes, seed_neighborhoods};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn case_numbers(incidents: &[Incident]) -> Vec<&str> {
        incidents.iter().map(|i| i.case_number.as_str()).collect()
    }

    #[test]
    fn unfiltered_codes_have_no_where_clause() {
        let compiled = compile_codes(&CodeQuery::default());
        assert_eq!(
            compiled.sql,
            "SELECT code, incident_type FROM codes ORDER BY code ASC"
        );
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn code_list_becomes_single_membership_test() {
        let compiled = compile_codes(&CodeQuery {
            codes: Some(vec![110, 700]),
        });
        assert_eq!(
            compiled.sql,
            "SELECT code, incident_type FROM codes WHERE code IN ($1, $2) ORDER BY code ASC"
        );
        assert_eq!(compiled.params.len(), 2);
    }

    #[test]
    fn empty_list_matches_nothing() {
        let compiled = compile_neighborhoods(&NeighborhoodQuery { ids: Some(vec![]) });
        assert!(compiled.sql.contains("WHERE 0 = 1"));
        assert!(compiled.params.is_empty());
    }

    #[test]
    fn incident_predicates_number_placeholders_in_order() {
        let compiled = compile_incidents(&IncidentQuery {
            start_date: Some(date("2019-09-01")),
            end_date: Some(date("2019-09-30")),
            codes: Some(vec![110]),
            grids: Some(vec![87, 88]),
            neighborhoods: None,
            limit: 5,
        });

        assert!(compiled.sql.contains(
            "WHERE date(date_time) >= $1 AND date(date_time) <= $2 \
             AND code IN ($3) AND police_grid IN ($4, $5) \
             ORDER BY date_time DESC, case_number DESC LIMIT $6"
        ));
        assert!(!compiled.sql.contains("neighborhood_number IN"));
        assert_eq!(compiled.params.len(), 6);
    }

    #[test]
    fn unfiltered_incidents_only_bind_limit() {
        let compiled = compile_incidents(&IncidentQuery::default());
        assert!(!compiled.sql.contains("WHERE"));
        assert!(compiled.sql.contains("LIMIT $1"));
        assert_eq!(compiled.params.len(), 1);
    }

    #[tokio::test]
    async fn codes_filtered_and_ordered() {
        let test_db = open_test_db().await;
        let db = test_db.db.as_ref();
        seed_codes(db, &[(700, "Auto Theft"), (110, "Murder"), (300, "Robbery")]).await;

        let all = query_codes(db, &CodeQuery::default()).await.unwrap();
        let codes: Vec<i64> = all.iter().map(|c| c.code).collect();
        assert_eq!(codes, vec![110, 300, 700]);

        let some = query_codes(
            db,
            &CodeQuery {
                codes: Some(vec![700, 110]),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            some,
            vec![
                IncidentCode {
                    code: 110,
                    incident_type: "Murder".to_string()
                },
                IncidentCode {
                    code: 700,
                    incident_type: "Auto Theft".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn neighborhoods_filtered_and_ordered() {
        let test_db = open_test_db().await;
        let db = test_db.db.as_ref();
        seed_neighborhoods(
            db,
            &[(3, "West Side"), (1, "Conway/Battlecreek/Highwood"), (2, "Greater East Side")],
        )
        .await;

        let all = query_neighborhoods(db, &NeighborhoodQuery::default())
            .await
            .unwrap();
        let ids: Vec<i64> = all.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let some = query_neighborhoods(db, &NeighborhoodQuery { ids: Some(vec![3, 9]) })
            .await
            .unwrap();
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].name, "West Side");
    }

    #[tokio::test]
    async fn date_window_is_inclusive_and_ascending() {
        let test_db = open_test_db().await;
        let db = test_db.db.as_ref();
        for i in [
            incident("A3", "2019-10-01T00:00:00", 110, 87, 7),
            incident("A2", "2019-09-10T12:00:00", 110, 87, 7),
            incident("A1", "2019-09-05T08:30:00", 110, 87, 7),
            incident("A0", "2019-08-31T23:59:59", 110, 87, 7),
            incident("A4", "2019-09-30T23:59:59", 110, 87, 7),
        ] {
            insert_incident(db, &i).await.unwrap();
        }

        let found = query_incidents(
            db,
            &IncidentQuery {
                start_date: Some(date("2019-09-01")),
                end_date: Some(date("2019-09-30")),
                ..IncidentQuery::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(case_numbers(&found), vec!["A1", "A2", "A4"]);
    }

    #[tokio::test]
    async fn filters_are_conjunctive_across_kinds() {
        let test_db = open_test_db().await;
        let db = test_db.db.as_ref();
        for i in [
            incident("B1", "2019-09-01T10:00:00", 110, 87, 7),
            incident("B2", "2019-09-02T10:00:00", 700, 87, 7),
            incident("B3", "2019-09-03T10:00:00", 110, 88, 7),
            incident("B4", "2019-09-04T10:00:00", 110, 87, 8),
            incident("B5", "2019-09-05T10:00:00", 300, 87, 7),
        ] {
            insert_incident(db, &i).await.unwrap();
        }

        let found = query_incidents(
            db,
            &IncidentQuery {
                codes: Some(vec![110, 300]),
                grids: Some(vec![87]),
                neighborhoods: Some(vec![7]),
                ..IncidentQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(case_numbers(&found), vec!["B1", "B5"]);

        let unfiltered = query_incidents(db, &IncidentQuery::default()).await.unwrap();
        let all_codes = query_incidents(
            db,
            &IncidentQuery {
                codes: Some(vec![110, 300, 700]),
                ..IncidentQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(unfiltered, all_codes);

        let nothing = query_incidents(
            db,
            &IncidentQuery {
                grids: Some(vec![]),
                ..IncidentQuery::default()
            },
        )
        .await
        .unwrap();
        assert!(nothing.is_empty());
    }

    #[tokio::test]
    async fn limit_keeps_most_recent_and_breaks_ties_by_case_number() {
        let test_db = open_test_db().await;
        let db = test_db.db.as_ref();
        for i in [
            incident("C1", "2019-09-01T10:00:00", 110, 87, 7),
            incident("C4", "2019-09-03T10:00:00", 110, 87, 7),
            incident("C2", "2019-09-03T10:00:00", 110, 87, 7),
            incident("C3", "2019-09-03T10:00:00", 110, 87, 7),
            incident("C5", "2019-09-04T10:00:00", 110, 87, 7),
        ] {
            insert_incident(db, &i).await.unwrap();
        }

        let all = query_incidents(db, &IncidentQuery::default()).await.unwrap();
        assert_eq!(case_numbers(&all), vec!["C1", "C2", "C3", "C4", "C5"]);

        let recent = query_incidents(
            db,
            &IncidentQuery {
                limit: 3,
                ..IncidentQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(case_numbers(&recent), vec!["C3", "C4", "C5"]);
    }

    #[tokio::test]
    async fn incident_fields_survive_storage() {
        let test_db = open_test_db().await;
        let db = test_db.db.as_ref();
        let stored = incident("19245020", "2019-10-30T23:57:08", 9954, 87, 7);
        insert_incident(db, &stored).await.unwrap();

        let found = query_incidents(db, &IncidentQuery::default()).await.unwrap();
        assert_eq!(found, vec![stored]);
    }
}
