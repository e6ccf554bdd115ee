//! Category and speciality handlers. Both kinds share one implementation.

use super::{json_body, parse_id};
use crate::error::{AppError, ErrorBody};
use crate::model::{Lookup, LookupKind};
use crate::response::{success_many, success_one, success_one_ok};
use crate::serializer::{parse_body, LookupListQuery, LookupPayload};
use crate::service::{LookupService, RequestValidator, WriteMode};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

async fn list_kind(state: AppState, kind: LookupKind, query: LookupListQuery) -> Result<impl IntoResponse, AppError> {
    let rows = LookupService::list(&state.pool, kind, query.active).await?;
    Ok(success_many(rows, None, None))
}

async fn create_kind(state: AppState, kind: LookupKind, body: Value) -> Result<impl IntoResponse, AppError> {
    let payload: LookupPayload = parse_body(body)?;
    let changes = RequestValidator::lookup(payload, WriteMode::Create)?;
    let row = LookupService::create(&state.pool, kind, &changes).await?;
    Ok(success_one(row))
}

async fn update_kind(state: AppState, kind: LookupKind, id: &str, body: Value) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(id)?;
    let payload: LookupPayload = parse_body(body)?;
    let changes = RequestValidator::lookup(payload, WriteMode::Partial)?;
    let row = LookupService::update(&state.pool, kind, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", kind.label(), id)))?;
    Ok(success_one_ok(row))
}

#[utoipa::path(
    get,
    path = "/api/doctors/category/list",
    tag = "lookups",
    params(("active" = Option<bool>, Query, description = "Only rows with this active flag")),
    responses((status = 200, description = "Categories ordered by id in `data`", body = [Lookup]))
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<LookupListQuery>,
) -> Result<impl IntoResponse, AppError> {
    list_kind(state, LookupKind::Category, query).await
}

#[utoipa::path(
    post,
    path = "/api/doctors/category/create",
    tag = "lookups",
    request_body = LookupPayload,
    responses(
        (status = 201, description = "Created category in `data`", body = Lookup),
        (status = 409, description = "Name already taken", body = ErrorBody),
        (status = 422, description = "Missing or too long name", body = ErrorBody),
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    create_kind(state, LookupKind::Category, json_body(body)?).await
}

#[utoipa::path(
    patch,
    path = "/api/doctors/category/{id}/update",
    tag = "lookups",
    params(("id" = i64, Path, description = "Category id")),
    request_body = LookupPayload,
    responses(
        (status = 200, description = "Updated category in `data`", body = Lookup),
        (status = 404, description = "No such category", body = ErrorBody),
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    update_kind(state, LookupKind::Category, &id, json_body(body)?).await
}

#[utoipa::path(
    get,
    path = "/api/doctors/speciality/list",
    tag = "lookups",
    params(("active" = Option<bool>, Query, description = "Only rows with this active flag")),
    responses((status = 200, description = "Specialities ordered by id in `data`", body = [Lookup]))
)]
pub async fn list_specialities(
    State(state): State<AppState>,
    Query(query): Query<LookupListQuery>,
) -> Result<impl IntoResponse, AppError> {
    list_kind(state, LookupKind::Speciality, query).await
}

#[utoipa::path(
    post,
    path = "/api/doctors/speciality/create",
    tag = "lookups",
    request_body = LookupPayload,
    responses(
        (status = 201, description = "Created speciality in `data`", body = Lookup),
        (status = 409, description = "Name already taken", body = ErrorBody),
        (status = 422, description = "Missing or too long name", body = ErrorBody),
    )
)]
pub async fn create_speciality(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    create_kind(state, LookupKind::Speciality, json_body(body)?).await
}

#[utoipa::path(
    patch,
    path = "/api/doctors/speciality/{id}/update",
    tag = "lookups",
    params(("id" = i64, Path, description = "Speciality id")),
    request_body = LookupPayload,
    responses(
        (status = 200, description = "Updated speciality in `data`", body = Lookup),
        (status = 404, description = "No such speciality", body = ErrorBody),
    )
)]
pub async fn update_speciality(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    update_kind(state, LookupKind::Speciality, &id, json_body(body)?).await
}
