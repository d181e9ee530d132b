#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Typed filter configurations for the crime API listing queries.
//!
//! Each recognized request parameter maps to exactly one named, typed
//! field. List filters are `Option<Vec<_>>`: `None` means the parameter was
//! absent and applies no restriction, while `Some(vec![])` is a distinct
//! (and fully restrictive) state. These types are produced by the server's
//! parameter parsing and consumed by `crime_api_database::queries`.

use chrono::NaiveDate;
use crime_api_crime_models::DEFAULT_INCIDENT_LIMIT;
use serde::{Deserialize, Serialize};

/// Filter for the incident code reference table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeQuery {
    /// Restrict to these codes.
    pub codes: Option<Vec<i64>>,
}

/// Filter for the neighborhood reference table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodQuery {
    /// Restrict to these neighborhood numbers.
    pub ids: Option<Vec<i64>>,
}

/// Parameters for listing crime incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentQuery {
    /// Inclusive lower bound on the occurrence date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the occurrence date.
    pub end_date: Option<NaiveDate>,
    /// Restrict to these incident codes.
    pub codes: Option<Vec<i64>>,
    /// Restrict to these police grid numbers.
    pub grids: Option<Vec<i64>>,
    /// Restrict to these neighborhood numbers.
    pub neighborhoods: Option<Vec<i64>>,
    /// Maximum number of rows to return. The most recent rows of the
    /// filtered set are kept.
    pub limit: u32,
}

impl Default for IncidentQuery {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            codes: None,
            grids: None,
            neighborhoods: None,
            limit: DEFAULT_INCIDENT_LIMIT,
        }
    }
}

impl IncidentQuery {
    /// Returns `true` if no filter predicate is active.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.codes.is_none()
            && self.grids.is_none()
            && self.neighborhoods.is_none()
    }
}
