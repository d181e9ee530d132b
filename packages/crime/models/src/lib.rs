#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime incident, code, and neighborhood entity types.
//!
//! This crate defines the canonical shapes of the three entities served by
//! the crime API: reported incidents, the incident code reference table,
//! and the neighborhood reference table. Incidents carry a single
//! occurrence timestamp which is split into separate date and time fields
//! only at the API boundary.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row cap applied to incident listings when the caller gives no `limit`.
pub const DEFAULT_INCIDENT_LIMIT: u32 = 1000;

/// Calendar date format used on the wire (`2019-10-30`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format used on the wire (`23:57:08`).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Storage format of the combined incident timestamp (`2019-10-30T23:57:08`).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Error returned when a date, time, or timestamp string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}'")]
pub struct InvalidTemporalError {
    /// What was being parsed (`date`, `time`, or `timestamp`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`InvalidTemporalError`] if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<NaiveDate, InvalidTemporalError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| InvalidTemporalError {
        kind: "date",
        value: value.to_string(),
    })
}

/// Parses an `HH:MM:SS` time of day. Fractional seconds are accepted and
/// truncated.
///
/// # Errors
///
/// Returns [`InvalidTemporalError`] if the string is not a valid time.
pub fn parse_time(value: &str) -> Result<NaiveTime, InvalidTemporalError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
        .map(truncate_subsec)
        .map_err(|_| InvalidTemporalError {
            kind: "time",
            value: value.to_string(),
        })
}

/// Parses a stored `YYYY-MM-DDTHH:MM:SS` timestamp.
///
/// # Errors
///
/// Returns [`InvalidTemporalError`] if the string is not a valid timestamp.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime, InvalidTemporalError> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| {
        InvalidTemporalError {
            kind: "timestamp",
            value: value.to_string(),
        }
    })
}

fn truncate_subsec(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

/// An entry in the incident code reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentCode {
    /// Numeric classification code.
    pub code: i64,
    /// Human-readable incident type label.
    pub incident_type: String,
}

/// An entry in the neighborhood reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    /// Neighborhood number.
    pub id: i64,
    /// Neighborhood name.
    pub name: String,
}

/// A single reported crime incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Unique case number assigned by the police department.
    pub case_number: String,
    /// When the incident occurred, to second precision.
    pub occurred_at: NaiveDateTime,
    /// Incident code (see [`IncidentCode`]).
    pub code: i64,
    /// Incident type label as recorded with the report.
    pub incident: String,
    /// Police grid number.
    pub police_grid: i64,
    /// Neighborhood number (see [`Neighborhood`]).
    pub neighborhood_number: i64,
    /// Street block description.
    pub block: String,
}

impl Incident {
    /// Calendar date the incident occurred on.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.occurred_at.date()
    }

    /// Time of day the incident occurred at.
    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.occurred_at.time()
    }

    /// Formats the occurrence timestamp the way it is persisted.
    #[must_use]
    pub fn stored_date_time(&self) -> String {
        self.occurred_at.format(DATE_TIME_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_date_and_time() {
        assert_eq!(
            parse_date("2019-10-30").unwrap(),
            NaiveDate::from_ymd_opt(2019, 10, 30).unwrap()
        );
        assert_eq!(
            parse_time("23:57:08").unwrap(),
            NaiveTime::from_hms_opt(23, 57, 8).unwrap()
        );
    }

    #[test]
    fn truncates_fractional_seconds() {
        assert_eq!(
            parse_time("08:15:30.250").unwrap(),
            NaiveTime::from_hms_opt(8, 15, 30).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(parse_date("2019-13-01").is_err());
        assert!(parse_date("10/30/2019").is_err());
        assert!(parse_time("25:00:00").is_err());
        assert!(parse_date_time("2019-10-30 23:57:08").is_err());

        let err = parse_date("yesterday").unwrap_err();
        assert_eq!(err.kind, "date");
        assert_eq!(err.value, "yesterday");
    }

    #[test]
    fn stored_timestamp_splits_into_date_and_time() {
        let incident = Incident {
            case_number: "19245020".to_string(),
            occurred_at: parse_date_time("2019-10-30T23:57:08").unwrap(),
            code: 9954,
            incident: "Proactive Police Visit".to_string(),
            police_grid: 87,
            neighborhood_number: 7,
            block: "THOMAS AV  & VICTORIA".to_string(),
        };

        assert_eq!(incident.date().format(DATE_FORMAT).to_string(), "2019-10-30");
        assert_eq!(incident.time().format(TIME_FORMAT).to_string(), "23:57:08");
        assert_eq!(incident.stored_date_time(), "2019-10-30T23:57:08");
    }
}
