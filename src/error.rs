//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("checksum mismatch for applied migration {id}: recorded {recorded}, embedded {embedded}")]
    ChecksumMismatch {
        id: String,
        recorded: String,
        embedded: String,
    },
    #[error("database has migration {0} which this build does not know about")]
    UnknownApplied(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Human-readable message for a named table constraint.
fn constraint_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("doctor_full_name_key") => "doctor with this full name already exists".into(),
        Some("doctor_category_name_key") => "doctor category with this name already exists".into(),
        Some("doctor_speciality_name_key") => "doctor speciality with this name already exists".into(),
        Some("doctor_location_doctor_hospital_key") => {
            "doctor location with this doctor and hospital name already exists".into()
        }
        Some(name) => format!("constraint {} violated", name),
        None => "constraint violated".into(),
    }
}

impl AppError {
    /// Status and machine-readable code, with constraint violations surfaced as client errors.
    fn classify(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None),
            AppError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "migration_error", None),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", None),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict", None),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", None),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    return (StatusCode::NOT_FOUND, "not_found", None);
                }
                match e.as_database_error() {
                    Some(db) if matches!(db.kind(), ErrorKind::UniqueViolation) => (
                        StatusCode::CONFLICT,
                        "conflict",
                        Some(constraint_message(db.constraint())),
                    ),
                    Some(db) if matches!(db.kind(), ErrorKind::ForeignKeyViolation) => (
                        StatusCode::BAD_REQUEST,
                        "bad_request",
                        Some(format!("invalid reference ({})", db.constraint().unwrap_or("foreign key"))),
                    ),
                    Some(db) if matches!(db.kind(), ErrorKind::CheckViolation) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "validation_error",
                        Some(constraint_message(db.constraint())),
                    ),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None),
                }
            }
        }
    }
}

impl AppError {
    /// Client errors carry their own text; server-side detail stays in the log.
    fn client_message(&self, status: StatusCode) -> String {
        match self {
            AppError::NotFound(m) | AppError::Validation(m) | AppError::BadRequest(m) | AppError::Conflict(m) => {
                m.clone()
            }
            _ if status.is_server_error() => "internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let message = message.unwrap_or_else(|| self.client_message(status));
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
