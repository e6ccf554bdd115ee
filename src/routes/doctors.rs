//! Doctor directory routes under `/api/doctors`.

use crate::handlers::{doctor, location, lookup};
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

pub fn doctor_routes(state: AppState) -> Router {
    Router::new()
        .route("/doctor/list", get(doctor::list))
        .route("/doctor/create", post(doctor::create))
        .route("/doctor/:id", get(doctor::retrieve))
        .route("/doctor/:id/update", put(doctor::replace).patch(doctor::patch))
        .route("/doctor/:id/delete", delete(doctor::delete))
        .route("/doctor/:id/locations", get(location::list).post(location::create))
        .route("/location/:id", patch(location::update).delete(location::delete))
        .route("/category/list", get(lookup::list_categories))
        .route("/category/create", post(lookup::create_category))
        .route("/category/:id/update", patch(lookup::update_category))
        .route("/speciality/list", get(lookup::list_specialities))
        .route("/speciality/create", post(lookup::create_speciality))
        .route("/speciality/:id/update", patch(lookup::update_speciality))
        .with_state(state)
}
