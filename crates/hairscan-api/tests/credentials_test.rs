//! Upload-credential issuance tests.

mod helpers;

use axum::http::{HeaderValue, Method};
use chrono::{DateTime, Duration, Utc};
use helpers::{api_path, setup_test_server, StubInference, StubStorage};
use serde_json::json;

fn server() -> axum_test::TestServer {
    setup_test_server(
        StubStorage::empty(),
        StubInference::with_predictions(Vec::new()),
        None,
    )
}

#[tokio::test]
async fn issued_credential_echoes_inputs_and_expires_in_15_minutes() {
    let server = server();
    let issued_at = Utc::now();

    let response = server
        .post(&api_path("/uploads/credentials"))
        .json(&json!({"fileName": "scan1.jpg", "contentType": "image/jpeg"}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["fileName"], "scan1.jpg");
    assert_eq!(body["contentType"], "image/jpeg");
    let url = body["url"].as_str().unwrap();
    assert!(url.contains("scans/scan1.jpg"));

    let expires_at: DateTime<Utc> =
        serde_json::from_value(body["expires_at"].clone()).unwrap();
    let ttl = expires_at - issued_at;
    assert!(ttl > Duration::minutes(14) && ttl <= Duration::minutes(15) + Duration::seconds(5));
}

#[tokio::test]
async fn missing_fields_are_rejected_before_signing() {
    let server = server();

    let response = server
        .post(&api_path("/uploads/credentials"))
        .json(&json!({"fileName": "scan1.jpg"}))
        .await;
    response.assert_status_bad_request();

    let response = server
        .post(&api_path("/uploads/credentials"))
        .json(&json!({"fileName": "", "contentType": "image/jpeg"}))
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn traversal_filenames_are_rejected() {
    let server = server();

    let response = server
        .post(&api_path("/uploads/credentials"))
        .json(&json!({"fileName": "../secrets.jpg", "contentType": "image/jpeg"}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn content_type_must_match_extension() {
    let server = server();

    let response = server
        .post(&api_path("/uploads/credentials"))
        .json(&json!({"fileName": "scan1.png", "contentType": "image/jpeg"}))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn cors_preflight_is_answered_with_200() {
    let server = server();

    let response = server
        .method(Method::OPTIONS, &api_path("/uploads/credentials"))
        .add_header(
            axum::http::header::ORIGIN,
            HeaderValue::from_static("https://app.example.com"),
        )
        .add_header(
            axum::http::header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "");
}
