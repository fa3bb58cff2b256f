//! Scan ingestion and listing tests.
//!
//! Validation-path tests run against a lazy pool and never touch a database.
//! Round-trip tests need a live Postgres and are `#[ignore]`d; point
//! `DATABASE_URL` at a disposable database and run with `-- --ignored`.

mod helpers;

use base64::Engine;
use helpers::{
    api_path, sample_prediction, setup_test_server, setup_test_server_with_pool, test_config,
    StubInference, StubStorage,
};
use serde_json::json;

fn validation_server() -> axum_test::TestServer {
    setup_test_server(
        StubStorage::empty(),
        StubInference::with_predictions(vec![sample_prediction("follicular_unit", 0.9)]),
        None,
    )
}

#[tokio::test]
async fn store_without_subject_id_is_rejected() {
    let server = validation_server();

    let response = server
        .post(&api_path("/scans"))
        .json(&json!({"analysis_data": {"density_results": {"count": 12}}}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn store_without_analysis_data_is_rejected() {
    let server = validation_server();

    let response = server
        .post(&api_path("/scans"))
        .json(&json!({"subject_id": "s1"}))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn malformed_json_body_is_rejected_as_400() {
    let server = validation_server();

    let response = server
        .post(&api_path("/scans"))
        .content_type("application/json")
        .text("{not json")
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn list_without_subject_id_is_rejected() {
    let server = validation_server();

    let response = server.get(&api_path("/scans")).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn analyze_without_image_is_rejected() {
    let server = validation_server();

    let response = server
        .post(&api_path("/scans/analyze"))
        .json(&json!({"subject_id": "s1"}))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn analyze_unknown_object_is_404() {
    let server = validation_server();

    let response = server
        .post(&api_path("/scans/analyze"))
        .json(&json!({"subject_id": "s1", "fileName": "missing.jpg"}))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn health_reports_degraded_without_a_store() {
    let server = validation_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["in_flight_uploads"], serde_json::Value::Null);
}

// ---- Round-trip tests against a live Postgres ----

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn store_then_list_round_trips_the_document() {
    let pool = helpers::live_pool().await;
    let server = setup_test_server_with_pool(
        test_config(),
        pool,
        StubStorage::empty(),
        StubInference::with_predictions(Vec::new()),
        None,
    );

    let subject_id = format!("s-{}", uuid_suffix());
    let response = server
        .post(&api_path("/scans"))
        .json(&json!({
            "subject_id": subject_id,
            "analysis_data": {
                "density_results": {"count": 12},
                "scalp_condition": {"score": 3}
            }
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "success");
    let upload_id = body["upload_id"].as_str().unwrap().to_string();
    assert!(upload_id.starts_with("upload-"));

    let response = server
        .get(&api_path("/scans"))
        .add_query_param("subject_id", &subject_id)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_count"], 1);

    let record = &body["uploads"][0];
    assert_eq!(record["upload_id"], upload_id.as_str());
    assert_eq!(record["processing_status"], "completed");
    assert_eq!(record["analysis_results"]["density_results"]["count"], 12);
    // Unknown fragments survive the round trip.
    assert_eq!(record["analysis_results"]["scalp_condition"]["score"], 3);
    assert_eq!(record["analysis_results"]["upload_id"], upload_id.as_str());
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn listing_an_unknown_subject_yields_an_empty_page() {
    let pool = helpers::live_pool().await;
    let server = setup_test_server_with_pool(
        test_config(),
        pool,
        StubStorage::empty(),
        StubInference::with_predictions(Vec::new()),
        None,
    );

    let response = server
        .get(&api_path("/scans"))
        .add_query_param("subject_id", format!("nobody-{}", uuid_suffix()))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_count"], 0);
    assert_eq!(body["uploads"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn terminal_transitions_are_single_shot() {
    use hairscan_core::models::{AnalysisDocument, NewUpload};
    use hairscan_core::AppError;
    use hairscan_db::UploadRepository;

    let pool = helpers::live_pool().await;
    let uploads = UploadRepository::new(pool);

    // attach on unknown id → NotFound
    let missing = uploads
        .attach_results("upload-0-nonexistent", AnalysisDocument::new("upload-0-nonexistent"))
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    // attach twice → second is InvalidState
    let record = uploads
        .create(NewUpload::for_subject("s-transitions"))
        .await
        .unwrap();
    let mut document = AnalysisDocument::new(&record.upload_id);
    document.density_results = Some(json!({"count": 1}));
    uploads
        .attach_results(&record.upload_id, document.clone())
        .await
        .unwrap();
    let second = uploads.attach_results(&record.upload_id, document).await;
    assert!(matches!(second, Err(AppError::InvalidState(_))));

    // mark_error twice → second is InvalidState
    let record = uploads
        .create(NewUpload::for_subject("s-transitions"))
        .await
        .unwrap();
    uploads
        .mark_error(&record.upload_id, "inference timed out")
        .await
        .unwrap();
    let second = uploads.mark_error(&record.upload_id, "again").await;
    assert!(matches!(second, Err(AppError::InvalidState(_))));
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn concurrent_creates_yield_distinct_upload_ids() {
    use hairscan_core::models::NewUpload;
    use hairscan_db::UploadRepository;
    use std::collections::HashSet;

    let pool = helpers::live_pool().await;
    let uploads = UploadRepository::new(pool);

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let uploads = uploads.clone();
            tokio::spawn(async move {
                uploads
                    .create(NewUpload::for_subject("s-concurrent"))
                    .await
                    .unwrap()
                    .upload_id
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        assert!(ids.insert(task.await.unwrap()));
    }
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn failed_inference_leaves_exactly_one_error_record() {
    let pool = helpers::live_pool().await;
    let subject_id = format!("s-err-{}", uuid_suffix());
    let image = base64::engine::general_purpose::STANDARD.encode(b"not really a jpeg");

    let server = setup_test_server_with_pool(
        test_config(),
        pool.clone(),
        StubStorage::empty(),
        StubInference::failing("detection endpoint returned 503"),
        None,
    );

    let response = server
        .post(&api_path("/scans/analyze"))
        .json(&json!({"subject_id": subject_id, "imageBase64": image}))
        .await;
    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

    let response = server
        .get(&api_path("/scans"))
        .add_query_param("subject_id", &subject_id)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_count"], 1);
    let record = &body["uploads"][0];
    assert_eq!(record["processing_status"], "error");
    assert!(record["error_message"]
        .as_str()
        .unwrap()
        .contains("detection endpoint returned 503"));
}

fn uuid_suffix() -> String {
    hairscan_core::models::new_upload_id()
        .rsplit('-')
        .next()
        .unwrap()
        .to_string()
}
