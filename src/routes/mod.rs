//! Router assembly.

pub mod common;
pub mod docs;
pub mod doctors;

pub use common::common_routes;
pub use docs::{docs_routes, ApiDoc};
pub use doctors::doctor_routes;

use crate::config::AppConfig;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: operational routes, the doctor API under `/api/doctors` and the OpenAPI
/// document, with request tracing and a body size cap sized for image uploads.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(docs_routes())
        .nest("/api/doctors", doctor_routes(state))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}
