#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the crime API server.
//!
//! Query strings are deserialized into all-`Option<String>` parameter
//! structs and then parsed here into the typed filters of
//! `crime_api_database_models`, so that a malformed value fails the request
//! with a descriptive [`ParamError`] instead of being silently dropped.
//! Response types are kept separate from the entity types to allow
//! independent evolution of the API contract.

use crime_api_crime_models::{
    DATE_FORMAT, DEFAULT_INCIDENT_LIMIT, Incident, IncidentCode, InvalidTemporalError,
    Neighborhood, TIME_FORMAT, parse_date, parse_time,
};
use crime_api_database_models::{CodeQuery, IncidentQuery, NeighborhoodQuery};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Parameter errors
// ---------------------------------------------------------------------------

/// A request parameter or body field that could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// An item of a comma-separated list is not an integer.
    #[error("Invalid integer '{value}' in parameter '{param}'")]
    InvalidInteger {
        /// Parameter name.
        param: &'static str,
        /// The rejected item.
        value: String,
    },

    /// A date or time value could not be parsed.
    #[error("Invalid value for '{param}': {source}")]
    InvalidTemporal {
        /// Parameter or field name.
        param: &'static str,
        /// Underlying parse failure.
        source: InvalidTemporalError,
    },

    /// `limit` is not a positive integer.
    #[error("Invalid limit '{value}': expected a positive integer")]
    InvalidLimit {
        /// The rejected value.
        value: String,
    },

    /// A required body field is absent.
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// A required body field is present but blank.
    #[error("Field '{field}' must not be empty")]
    EmptyField {
        /// Field name.
        field: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Parameter parsing
// ---------------------------------------------------------------------------

/// Parses a comma-separated list of integers such as `110,700`.
///
/// Whitespace around items is ignored. Every item must be an integer; a
/// blank item (`110,,700` or an empty string) rejects the whole list.
///
/// # Errors
///
/// Returns [`ParamError::InvalidInteger`] naming the first bad item.
pub fn parse_id_list(param: &'static str, raw: &str) -> Result<Vec<i64>, ParamError> {
    raw.split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<i64>().map_err(|_| ParamError::InvalidInteger {
                param,
                value: item.to_string(),
            })
        })
        .collect()
}

/// Parses a positive row limit.
///
/// # Errors
///
/// Returns [`ParamError::InvalidLimit`] for zero, negative, or non-numeric
/// values.
pub fn parse_limit(raw: &str) -> Result<u32, ParamError> {
    match raw.trim().parse::<u32>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ParamError::InvalidLimit {
            value: raw.to_string(),
        }),
    }
}

fn parse_date_param(
    param: &'static str,
    raw: &str,
) -> Result<chrono::NaiveDate, ParamError> {
    parse_date(raw).map_err(|source| ParamError::InvalidTemporal { param, source })
}

fn parse_optional_list(
    param: &'static str,
    raw: Option<&str>,
) -> Result<Option<Vec<i64>>, ParamError> {
    raw.map(|r| parse_id_list(param, r)).transpose()
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for `GET /codes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeQueryParams {
    /// Comma-separated list of codes to include.
    pub code: Option<String>,
}

impl TryFrom<&CodeQueryParams> for CodeQuery {
    type Error = ParamError;

    fn try_from(params: &CodeQueryParams) -> Result<Self, Self::Error> {
        Ok(Self {
            codes: parse_optional_list("code", params.code.as_deref())?,
        })
    }
}

/// Query parameters for `GET /neighborhoods`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeighborhoodQueryParams {
    /// Comma-separated list of neighborhood numbers to include.
    pub id: Option<String>,
}

impl TryFrom<&NeighborhoodQueryParams> for NeighborhoodQuery {
    type Error = ParamError;

    fn try_from(params: &NeighborhoodQueryParams) -> Result<Self, Self::Error> {
        Ok(Self {
            ids: parse_optional_list("id", params.id.as_deref())?,
        })
    }
}

/// Query parameters for `GET /incidents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentQueryParams {
    /// Inclusive start date (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Inclusive end date (`YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// Comma-separated list of incident codes.
    pub code: Option<String>,
    /// Comma-separated list of police grid numbers.
    pub grid: Option<String>,
    /// Comma-separated list of neighborhood numbers.
    pub neighborhood: Option<String>,
    /// Maximum number of incidents to return.
    pub limit: Option<String>,
}

impl TryFrom<&IncidentQueryParams> for IncidentQuery {
    type Error = ParamError;

    fn try_from(params: &IncidentQueryParams) -> Result<Self, Self::Error> {
        Ok(Self {
            start_date: params
                .start_date
                .as_deref()
                .map(|d| parse_date_param("start_date", d))
                .transpose()?,
            end_date: params
                .end_date
                .as_deref()
                .map(|d| parse_date_param("end_date", d))
                .transpose()?,
            codes: parse_optional_list("code", params.code.as_deref())?,
            grids: parse_optional_list("grid", params.grid.as_deref())?,
            neighborhoods: parse_optional_list("neighborhood", params.neighborhood.as_deref())?,
            limit: params
                .limit
                .as_deref()
                .map(parse_limit)
                .transpose()?
                .unwrap_or(DEFAULT_INCIDENT_LIMIT),
        })
    }
}

// ---------------------------------------------------------------------------
// Mutation bodies
// ---------------------------------------------------------------------------

/// Body of `PUT /new-incident`.
///
/// Every field is optional at the serde level so that an absent field is
/// reported as [`ParamError::MissingField`] rather than a generic
/// deserialization failure. `incident` may be omitted; the server then
/// fills in the label of `code`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewIncidentRequest {
    /// Unique case number.
    pub case_number: Option<String>,
    /// Occurrence date (`YYYY-MM-DD`).
    pub date: Option<String>,
    /// Occurrence time (`HH:MM:SS`).
    pub time: Option<String>,
    /// Incident code.
    pub code: Option<i64>,
    /// Incident type label.
    pub incident: Option<String>,
    /// Police grid number.
    pub police_grid: Option<i64>,
    /// Neighborhood number.
    pub neighborhood_number: Option<i64>,
    /// Street block.
    pub block: Option<String>,
}

/// A validated `PUT /new-incident` body whose label may still need to be
/// filled in from the code table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNewIncident {
    /// The incident to store. `incident` is empty when the label was not
    /// supplied.
    pub incident: Incident,
    /// Whether the request supplied its own incident label.
    pub has_label: bool,
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ParamError> {
    value.ok_or(ParamError::MissingField { field })
}

fn required_text(field: &'static str, value: Option<&str>) -> Result<String, ParamError> {
    let value = required(field, value)?.trim();
    if value.is_empty() {
        return Err(ParamError::EmptyField { field });
    }
    Ok(value.to_string())
}

impl TryFrom<&NewIncidentRequest> for ValidatedNewIncident {
    type Error = ParamError;

    fn try_from(req: &NewIncidentRequest) -> Result<Self, Self::Error> {
        let case_number = required_text("case_number", req.case_number.as_deref())?;
        let date = parse_date_param("date", required("date", req.date.as_deref())?)?;
        let time = parse_time(required("time", req.time.as_deref())?)
            .map_err(|source| ParamError::InvalidTemporal {
                param: "time",
                source,
            })?;
        let code = required("code", req.code)?;
        let police_grid = required("police_grid", req.police_grid)?;
        let neighborhood_number = required("neighborhood_number", req.neighborhood_number)?;
        let block = required("block", req.block.clone())?;

        let label = req
            .incident
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());

        Ok(Self {
            incident: Incident {
                case_number,
                occurred_at: date.and_time(time),
                code,
                incident: label.unwrap_or_default().to_string(),
                police_grid,
                neighborhood_number,
                block,
            },
            has_label: label.is_some(),
        })
    }
}

/// Body of `DELETE /remove-incident`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoveIncidentRequest {
    /// Case number of the incident to remove.
    pub case_number: Option<String>,
}

impl RemoveIncidentRequest {
    /// Returns the trimmed, non-empty case number.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] if the case number is absent or blank.
    pub fn case_number(&self) -> Result<String, ParamError> {
        required_text("case_number", self.case_number.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// An incident code as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCode {
    /// Numeric code.
    pub code: i64,
    /// Incident type label.
    #[serde(rename = "type")]
    pub incident_type: String,
}

impl From<IncidentCode> for ApiCode {
    fn from(code: IncidentCode) -> Self {
        Self {
            code: code.code,
            incident_type: code.incident_type,
        }
    }
}

/// A neighborhood as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiNeighborhood {
    /// Neighborhood number.
    pub id: i64,
    /// Neighborhood name.
    pub name: String,
}

impl From<Neighborhood> for ApiNeighborhood {
    fn from(n: Neighborhood) -> Self {
        Self {
            id: n.id,
            name: n.name,
        }
    }
}

/// A crime incident as returned by the API, with date and time split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiIncident {
    /// Unique case number.
    pub case_number: String,
    /// Occurrence date (`YYYY-MM-DD`).
    pub date: String,
    /// Occurrence time (`HH:MM:SS`).
    pub time: String,
    /// Incident code.
    pub code: i64,
    /// Incident type label.
    pub incident: String,
    /// Police grid number.
    pub police_grid: i64,
    /// Neighborhood number.
    pub neighborhood_number: i64,
    /// Street block.
    pub block: String,
}

impl From<Incident> for ApiIncident {
    fn from(incident: Incident) -> Self {
        Self {
            date: incident.date().format(DATE_FORMAT).to_string(),
            time: incident.time().format(TIME_FORMAT).to_string(),
            case_number: incident.case_number,
            code: incident.code,
            incident: incident.incident,
            police_grid: incident.police_grid,
            neighborhood_number: incident.neighborhood_number,
            block: incident.block,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
