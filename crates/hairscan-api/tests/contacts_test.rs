//! Subject directory lookup tests.

mod helpers;

use axum::http::StatusCode;
use hairscan_core::models::ContactProfile;
use helpers::{api_path, setup_test_server, StubDirectory, StubInference, StubStorage};

fn server_with_directory(directory: Option<StubDirectory>) -> axum_test::TestServer {
    setup_test_server(
        StubStorage::empty(),
        StubInference::with_predictions(Vec::new()),
        directory,
    )
}

fn known_contact() -> ContactProfile {
    ContactProfile {
        id: "s1".to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
    }
}

#[tokio::test]
async fn lookup_without_subject_id_is_rejected() {
    let server = server_with_directory(Some(StubDirectory::with_contact(known_contact())));

    let response = server.get(&api_path("/contacts")).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn known_subject_resolves_to_a_profile() {
    let server = server_with_directory(Some(StubDirectory::with_contact(known_contact())));

    let response = server
        .get(&api_path("/contacts"))
        .add_query_param("subject_id", "s1")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["contact"]["id"], "s1");
    assert_eq!(body["contact"]["firstName"], "Ada");
    assert_eq!(body["contact"]["fullName"], "Ada Lovelace");
}

#[tokio::test]
async fn unknown_subject_is_404() {
    let server = server_with_directory(Some(StubDirectory::with_contact(known_contact())));

    let response = server
        .get(&api_path("/contacts"))
        .add_query_param("subject_id", "someone-else")
        .await;

    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn upstream_auth_failure_surfaces_as_401() {
    let server = server_with_directory(Some(StubDirectory::unauthorized()));

    let response = server
        .get(&api_path("/contacts"))
        .add_query_param("subject_id", "s1")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UPSTREAM_AUTH_ERROR");
}

#[tokio::test]
async fn unconfigured_directory_is_a_backend_error() {
    let server = server_with_directory(None);

    let response = server
        .get(&api_path("/contacts"))
        .add_query_param("subject_id", "s1")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
