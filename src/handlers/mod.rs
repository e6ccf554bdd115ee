//! HTTP handlers for doctors, their lookups and locations.

pub mod doctor;
pub mod location;
pub mod lookup;

use crate::error::AppError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

/// Path ids are positive integers; anything else is a client error rather than a 404.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!("invalid id: {}", raw))),
    }
}

/// Unwrap a JSON body, reporting malformed JSON in the standard error envelope.
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected request body");
            Err(AppError::BadRequest(rejection.body_text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        for raw in ["0", "-1", "abc", "1.5", ""] {
            assert!(matches!(parse_id(raw), Err(AppError::BadRequest(_))), "{}", raw);
        }
    }
}
