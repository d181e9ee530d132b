//! Request failure taxonomy and its mapping onto HTTP responses.

use actix_web::{HttpResponse, http::StatusCode};
use crime_api_database::{DbError, MutationError};
use crime_api_server_models::{ApiErrorBody, ParamError};
use thiserror::Error;

/// Every way a request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A parameter or body field was missing or malformed.
    #[error("{0}")]
    BadRequest(String),

    /// Insert of a case number that is already stored.
    #[error("Incident {case_number} already exists")]
    Conflict {
        /// The duplicate case number.
        case_number: String,
    },

    /// Delete of a case number that is not stored.
    #[error("Incident {case_number} does not exist")]
    NotFound {
        /// The missing case number.
        case_number: String,
    },

    /// The store failed.
    #[error("Database failure: {0}")]
    Store(#[from] DbError),
}

impl From<ParamError> for ApiError {
    fn from(e: ParamError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<MutationError> for ApiError {
    fn from(e: MutationError) -> Self {
        match e {
            MutationError::Conflict { case_number } => Self::Conflict { case_number },
            MutationError::NotFound { case_number } => Self::NotFound { case_number },
            MutationError::Db(e) => Self::Store(e),
        }
    }
}

impl ApiError {
    /// HTTP status for this failure.
    ///
    /// Conflicts and missing cases are reported as `500` unless
    /// `strict_status_codes` is set, in which case they use `409` and `404`.
    #[must_use]
    pub const fn status(&self, strict_status_codes: bool) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } if strict_status_codes => StatusCode::CONFLICT,
            Self::NotFound { .. } if strict_status_codes => StatusCode::NOT_FOUND,
            Self::Conflict { .. } | Self::NotFound { .. } | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Logs the failure and renders it as a JSON error response.
    #[must_use]
    pub fn to_response(&self, strict_status_codes: bool) -> HttpResponse {
        let message = match self {
            Self::Store(e) => {
                log::error!("{e}");
                "Database failure".to_string()
            }
            other => {
                log::debug!("Rejected request: {other}");
                other.to_string()
            }
        };

        HttpResponse::build(self.status(strict_status_codes)).json(ApiErrorBody { error: message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_statuses_report_server_errors() {
        let conflict = ApiError::Conflict {
            case_number: "A1".to_string(),
        };
        let missing = ApiError::NotFound {
            case_number: "Z9".to_string(),
        };

        assert_eq!(conflict.status(false), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(missing.status(false), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(conflict.status(true), StatusCode::CONFLICT);
        assert_eq!(missing.status(true), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_is_always_client_error() {
        let err = ApiError::from(ParamError::InvalidLimit {
            value: "0".to_string(),
        });
        assert_eq!(err.status(false), StatusCode::BAD_REQUEST);
        assert_eq!(err.status(true), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn mutation_errors_keep_their_kind() {
        let err = ApiError::from(MutationError::Conflict {
            case_number: "A1".to_string(),
        });
        assert!(matches!(err, ApiError::Conflict { ref case_number } if case_number == "A1"));

        let err = ApiError::from(MutationError::NotFound {
            case_number: "Z9".to_string(),
        });
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
