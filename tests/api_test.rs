// Router tests that never reach the database: input is rejected before any query runs.
// The pool points at a closed port so the readiness probe reports the outage.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::{error_code, error_message, send, send_request};
use doctor_directory::{app, AppConfig, AppState};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

fn offline_app(config: &AppConfig) -> Router {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://nobody@127.0.0.1:1/doctors")
        .unwrap();
    app(AppState::new(pool), config)
}

fn router() -> Router {
    offline_app(&AppConfig::default())
}

#[tokio::test]
async fn health_and_version_answer_without_database() {
    let app = router();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "doctor-directory");
}

#[tokio::test]
async fn ready_reports_unreachable_database() {
    let (status, body) = send(&router(), Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "unavailable");
}

#[tokio::test]
async fn openapi_document_lists_every_route() {
    let (status, body) = send(&router(), Method::GET, "/api/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    for path in [
        "/api/doctors/doctor/list",
        "/api/doctors/doctor/{id}",
        "/api/doctors/doctor/create",
        "/api/doctors/doctor/{id}/update",
        "/api/doctors/doctor/{id}/delete",
        "/api/doctors/doctor/{id}/locations",
        "/api/doctors/location/{id}",
        "/api/doctors/category/list",
        "/api/doctors/speciality/create",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
    assert!(paths["/api/doctors/doctor/{id}/update"]["put"].is_object());
    assert!(paths["/api/doctors/doctor/{id}/update"]["patch"].is_object());
}

#[tokio::test]
async fn malformed_filter_id_is_an_invalid_choice() {
    let (status, body) = send(&router(), Method::GET, "/api/doctors/doctor/list?categories=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "Select a valid choice. abc is not one of the available choices."
    );
}

#[tokio::test]
async fn non_numeric_path_id_is_bad_request() {
    let app = router();
    for (method, uri) in [
        (Method::GET, "/api/doctors/doctor/abc"),
        (Method::DELETE, "/api/doctors/doctor/0/delete"),
        (Method::GET, "/api/doctors/doctor/-3/locations"),
        (Method::DELETE, "/api/doctors/location/x"),
    ] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(error_code(&body), "bad_request");
    }
}

#[tokio::test]
async fn create_requires_full_name() {
    let (status, body) = send(&router(), Method::POST, "/api/doctors/doctor/create", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_code(&body), "validation_error");
    assert!(error_message(&body).contains("full_name"));
}

#[tokio::test]
async fn put_requires_full_name_but_patch_does_not_validate_it() {
    let app = router();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/doctors/doctor/1/update",
        Some(json!({ "gender": "F" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/doctors/doctor/1/update",
        Some(json!({ "gender": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error_message(&body).contains("gender"));
}

#[tokio::test]
async fn invalid_field_values_are_rejected() {
    let app = router();
    for body in [
        json!({ "fullName": "Dr. A", "status": "ARCHIVED" }),
        json!({ "fullName": "Dr. A", "websites": ["not a url"] }),
        json!({ "fullName": "Dr. A", "iCareBetter": "ftp//broken" }),
        json!({ "fullName": "Dr. A", "image": "***" }),
        json!({ "fullName": "x".repeat(101) }),
        json!({ "fullName": "Dr. A", "nancysNook": "yes" }),
    ] {
        let (status, resp) = send(&app, Method::POST, "/api/doctors/doctor/create", Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} -> {}", body, resp);
    }
}

#[tokio::test]
async fn body_must_be_a_json_object() {
    let app = router();
    let (status, _) = send(&app, Method::POST, "/api/doctors/doctor/create", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/doctors/category/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "bad_request");
}

#[tokio::test]
async fn lookup_and_location_input_is_validated() {
    let app = router();
    let (status, _) = send(&app, Method::POST, "/api/doctors/speciality/create", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/doctors/category/create",
        Some(json!({ "name": "c".repeat(31) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/doctors/doctor/1/locations",
        Some(json!({ "hospitalName": "General", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error_message(&body).contains("email"));
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let config = AppConfig {
        body_limit_bytes: 64,
        ..AppConfig::default()
    };
    let app = offline_app(&config);
    let payload = json!({ "fullName": "Dr. A", "image": "A".repeat(200) }).to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/doctors/doctor/create")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let (status, _) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _) = send(&router(), Method::GET, "/api/doctors/nurse/list", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
