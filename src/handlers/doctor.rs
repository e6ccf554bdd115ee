//! Doctor handlers: list with filters, retrieve, create, update, delete.

use super::{json_body, parse_id};
use crate::error::{AppError, ErrorBody};
use crate::filter::DoctorFilter;
use crate::model::{DoctorBasic, DoctorExtended};
use crate::response::{success_many, success_one, success_one_ok};
use crate::serializer::{parse_body, DoctorPayload};
use crate::service::{DoctorService, RequestValidator, WriteMode};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

#[utoipa::path(
    get,
    path = "/api/doctors/doctor/list",
    tag = "doctors",
    params(
        ("full_name" = Option<String>, Query, description = "Case-insensitive substring of the full name"),
        ("status" = Option<String>, Query, description = "Case-insensitive exact status"),
        ("categories" = Option<Vec<i64>>, Query, description = "Repeatable; matches any listed category"),
        ("specialities" = Option<Vec<i64>>, Query, description = "Repeatable; matches any listed speciality"),
        ("limit" = Option<u32>, Query, description = "Page size, default 100, max 1000"),
        ("offset" = Option<u32>, Query, description = "Rows to skip"),
    ),
    responses(
        (status = 200, description = "Page of doctors in `data`", body = [DoctorBasic]),
        (status = 400, description = "Unknown category or speciality id", body = ErrorBody),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let filter = DoctorFilter::from_query(&pairs)?;
    let rows = DoctorService::list(&state.pool, &filter).await?;
    Ok(success_many(rows, Some(filter.limit), Some(filter.offset)))
}

#[utoipa::path(
    get,
    path = "/api/doctors/doctor/{id}",
    tag = "doctors",
    params(("id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor with lookups and locations in `data`", body = DoctorExtended),
        (status = 404, description = "No such doctor", body = ErrorBody),
    )
)]
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let doctor = DoctorService::retrieve(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("doctor {}", id)))?;
    Ok(success_one_ok(doctor))
}

#[utoipa::path(
    post,
    path = "/api/doctors/doctor/create",
    tag = "doctors",
    request_body = DoctorPayload,
    responses(
        (status = 201, description = "Created doctor in `data`", body = DoctorBasic),
        (status = 400, description = "Unknown lookup id or malformed body", body = ErrorBody),
        (status = 409, description = "Full name already taken", body = ErrorBody),
        (status = 422, description = "Invalid field value", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload: DoctorPayload = parse_body(json_body(body)?)?;
    let changes = RequestValidator::doctor(payload, WriteMode::Create)?;
    let doctor = DoctorService::create(&state.pool, &changes).await?;
    Ok(success_one(doctor))
}

/// Full update: `full_name` is required, omitted optional fields keep their values.
#[utoipa::path(
    put,
    path = "/api/doctors/doctor/{id}/update",
    tag = "doctors",
    params(("id" = i64, Path, description = "Doctor id")),
    request_body = DoctorPayload,
    responses(
        (status = 200, description = "Updated doctor in `data`", body = DoctorBasic),
        (status = 404, description = "No such doctor", body = ErrorBody),
        (status = 422, description = "Invalid field value", body = ErrorBody),
    )
)]
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    write(state, &id, json_body(body)?, WriteMode::Replace).await
}

#[utoipa::path(
    patch,
    path = "/api/doctors/doctor/{id}/update",
    tag = "doctors",
    params(("id" = i64, Path, description = "Doctor id")),
    request_body = DoctorPayload,
    responses(
        (status = 200, description = "Updated doctor in `data`", body = DoctorBasic),
        (status = 404, description = "No such doctor", body = ErrorBody),
        (status = 422, description = "Invalid field value", body = ErrorBody),
    )
)]
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    write(state, &id, json_body(body)?, WriteMode::Partial).await
}

async fn write(state: AppState, id: &str, body: Value, mode: WriteMode) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(id)?;
    let payload: DoctorPayload = parse_body(body)?;
    let changes = RequestValidator::doctor(payload, mode)?;
    let doctor = DoctorService::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("doctor {}", id)))?;
    Ok(success_one_ok(doctor))
}

#[utoipa::path(
    delete,
    path = "/api/doctors/doctor/{id}/delete",
    tag = "doctors",
    params(("id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 204, description = "Doctor, its links and locations removed"),
        (status = 404, description = "No such doctor", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    if !DoctorService::delete(&state.pool, id).await? {
        return Err(AppError::NotFound(format!("doctor {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
