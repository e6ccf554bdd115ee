//! OpenAPI document for the HTTP surface, served as JSON.

use crate::error::{ErrorBody, ErrorDetail};
use crate::handlers::{doctor, location, lookup};
use crate::model::{DoctorBasic, DoctorExtended, DoctorLocation, DoctorStatus, Gender, Lookup};
use crate::serializer::{DoctorPayload, LocationPayload, LookupPayload};
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Doctor directory API"),
    paths(
        doctor::list,
        doctor::retrieve,
        doctor::create,
        doctor::replace,
        doctor::patch,
        doctor::delete,
        location::list,
        location::create,
        location::update,
        location::delete,
        lookup::list_categories,
        lookup::create_category,
        lookup::update_category,
        lookup::list_specialities,
        lookup::create_speciality,
        lookup::update_speciality,
    ),
    components(schemas(
        DoctorBasic,
        DoctorExtended,
        DoctorLocation,
        DoctorStatus,
        Gender,
        Lookup,
        DoctorPayload,
        LookupPayload,
        LocationPayload,
        ErrorBody,
        ErrorDetail,
    )),
    tags(
        (name = "doctors", description = "Doctor profiles"),
        (name = "lookups", description = "Categories and specialities"),
        (name = "locations", description = "Where a doctor practises"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /api/openapi.json
pub fn docs_routes() -> Router {
    Router::new().route("/api/openapi.json", get(openapi_json))
}
