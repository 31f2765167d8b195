//! # Error Handling
//!
//! Every failure a handler can surface is an [`AppError`]. Conversion into an
//! HTTP response goes through [`ApiError`], which carries the status code and a
//! client-safe message. Internal detail (SQL text, upstream bodies for 5xx) is
//! logged, never echoed back.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, RuntimeErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const VALIDATION_MESSAGE: &str = "Please correct the highlighted fields and try again.";
pub const CONSTRAINT_MESSAGE: &str = "Some inputs are not valid. Please review and try again.";
pub const INTEGRITY_MESSAGE: &str =
    "We couldn't save your changes due to data rules. Please review the inputs and try again.";
pub const UNCLASSIFIED_MESSAGE: &str = "Something went wrong. Please try again or come back later.";
pub const UNAUTHENTICATED_MESSAGE: &str = "Authentication required";
pub const MALFORMED_BODY_MESSAGE: &str =
    "The request body could not be read. Please check the format and try again.";

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Path of the offending field, e.g. `hrContacts[0].email`
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    #[serde(skip_serializing, skip_deserializing)]
    pub status: StatusCode,
    /// Human-readable message suitable for display
    pub message: String,
    /// Per-field details for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self)).into_response()
    }
}

/// Application error taxonomy.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body failed field validation before reaching the store.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    /// The store rejected an aggregate whose fields break a declared constraint.
    #[error("constraint violation on {} field(s)", .0.len())]
    ConstraintViolation(Vec<FieldError>),
    /// The database refused a write (unique, foreign key, not-null or check).
    #[error("data integrity violation: {0}")]
    DataIntegrity(#[source] DbErr),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("authentication required")]
    Unauthenticated,
    #[error("{0}")]
    Misconfigured(String),
    /// The upstream token endpoint answered with a non-2xx status; carries its body.
    #[error("upstream rejected request: {0}")]
    UpstreamBadRequest(String),
    #[error("{0}")]
    UpstreamUnavailable(String),
    #[error("database error: {0}")]
    Database(#[source] DbErr),
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::ConstraintViolation(_)
            | AppError::DataIntegrity(_)
            | AppError::BadRequest(_)
            | AppError::UpstreamBadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Misconfigured(_) | AppError::Database(_) | AppError::Unclassified(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        let status = error.status();
        match error {
            AppError::Validation(errors) => {
                ApiError::new(status, VALIDATION_MESSAGE).with_errors(errors)
            }
            AppError::ConstraintViolation(errors) => {
                ApiError::new(status, CONSTRAINT_MESSAGE).with_errors(errors)
            }
            AppError::DataIntegrity(source) => {
                tracing::debug!(error = ?source, "Integrity violation rejected write");
                ApiError::new(status, INTEGRITY_MESSAGE)
            }
            AppError::NotFound(message)
            | AppError::BadRequest(message)
            | AppError::UpstreamBadRequest(message)
            | AppError::UpstreamUnavailable(message) => ApiError::new(status, message),
            AppError::Unauthenticated => ApiError::new(status, UNAUTHENTICATED_MESSAGE),
            AppError::Misconfigured(message) => {
                tracing::error!(%message, "Service misconfigured");
                ApiError::new(status, message)
            }
            AppError::Database(source) => {
                tracing::error!(error = ?source, "Database error");
                ApiError::new(status, UNCLASSIFIED_MESSAGE)
            }
            AppError::Unclassified(source) => {
                tracing::error!("Unhandled error: {:?}", source);
                ApiError::new(status, UNCLASSIFIED_MESSAGE)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

fn is_integrity_violation(error: &DbErr) -> bool {
    // SQLSTATE class 23 covers every integrity constraint on Postgres.
    const PG_INTEGRITY_CLASS: &str = "23";
    // Extended result codes: unique, primary key, foreign key, not null, check.
    const SQLITE_INTEGRITY_CODES: &[&str] = &["2067", "1555", "787", "1299", "275"];

    let sqlx_err = match error {
        DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = sqlx_err.as_database_error() else {
        return false;
    };

    if db_error.is_unique_violation()
        || db_error.is_foreign_key_violation()
        || db_error.is_check_violation()
    {
        return true;
    }

    if let Some(code) = db_error.code() {
        let code = code.as_ref();
        return (code.len() == 5 && code.starts_with(PG_INTEGRITY_CLASS))
            || SQLITE_INTEGRITY_CODES.contains(&code);
    }

    false
}

impl From<DbErr> for AppError {
    fn from(error: DbErr) -> Self {
        if is_integrity_violation(&error) {
            return AppError::DataIntegrity(error);
        }
        match error {
            DbErr::RecordNotFound(record) => AppError::NotFound(record),
            other => AppError::Database(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        AppError::BadRequest(MALFORMED_BODY_MESSAGE.to_string())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected path parameter");
        AppError::ConstraintViolation(vec![FieldError::new("id", "Id must be a number")])
    }
}
