//! Doctor location handlers.

use super::{json_body, parse_id};
use crate::error::{AppError, ErrorBody};
use crate::model::DoctorLocation;
use crate::response::{success_many, success_one, success_one_ok};
use crate::serializer::{parse_body, LocationPayload};
use crate::service::{LocationService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

#[utoipa::path(
    get,
    path = "/api/doctors/doctor/{id}/locations",
    tag = "locations",
    params(("id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "The doctor's locations in `data`", body = [DoctorLocation]),
        (status = 404, description = "No such doctor", body = ErrorBody),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let doctor_id = parse_id(&doctor_id)?;
    let rows = LocationService::list_for_doctor(&state.pool, doctor_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("doctor {}", doctor_id)))?;
    Ok(success_many(rows, None, None))
}

#[utoipa::path(
    post,
    path = "/api/doctors/doctor/{id}/locations",
    tag = "locations",
    params(("id" = i64, Path, description = "Doctor id")),
    request_body = LocationPayload,
    responses(
        (status = 201, description = "Created location in `data`", body = DoctorLocation),
        (status = 404, description = "No such doctor", body = ErrorBody),
        (status = 409, description = "Doctor already has a location at this hospital", body = ErrorBody),
        (status = 422, description = "Invalid phone or email", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let doctor_id = parse_id(&doctor_id)?;
    let payload: LocationPayload = parse_body(json_body(body)?)?;
    let changes = RequestValidator::location(payload)?;
    let row = LocationService::create(&state.pool, doctor_id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("doctor {}", doctor_id)))?;
    Ok(success_one(row))
}

#[utoipa::path(
    patch,
    path = "/api/doctors/location/{id}",
    tag = "locations",
    params(("id" = i64, Path, description = "Location id")),
    request_body = LocationPayload,
    responses(
        (status = 200, description = "Updated location in `data`", body = DoctorLocation),
        (status = 404, description = "No such location", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let payload: LocationPayload = parse_body(json_body(body)?)?;
    let changes = RequestValidator::location(payload)?;
    let row = LocationService::update(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("location {}", id)))?;
    Ok(success_one_ok(row))
}

#[utoipa::path(
    delete,
    path = "/api/doctors/location/{id}",
    tag = "locations",
    params(("id" = i64, Path, description = "Location id")),
    responses(
        (status = 204, description = "Location removed"),
        (status = 404, description = "No such location", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    if !LocationService::delete(&state.pool, id).await? {
        return Err(AppError::NotFound(format!("location {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
