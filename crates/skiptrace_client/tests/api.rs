use std::fs;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use skiptrace_client::{ClientSettings, FailureKind, JobApi, ReqwestJobApi, ResultRecord};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestJobApi {
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    ReqwestJobApi::new(&settings).expect("client builds")
}

fn csv_fixture() -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("leads.csv");
    fs::write(&path, "Business_Name,Address\nAcme,1 Main St\n").unwrap();
    (temp, path)
}

#[tokio::test]
async fn upload_sends_multipart_file_and_returns_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"leads.csv\""))
        .and(body_string_contains("Acme,1 Main St"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "3f2a",
            "message": "File uploaded successfully, processing started"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_temp, file) = csv_fixture();
    let job_id = api_for(&server).upload(&file).await.expect("upload ok");
    assert_eq!(job_id, "3f2a");
}

#[tokio::test]
async fn upload_surfaces_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Only CSV files are allowed" })),
        )
        .mount(&server)
        .await;

    let (_temp, file) = csv_fixture();
    let err = api_for(&server).upload(&file).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(err.message, "Only CSV files are allowed");
}

#[tokio::test]
async fn upload_without_detail_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let (_temp, file) = csv_fixture();
    let err = api_for(&server).upload(&file).await.unwrap_err();
    assert_eq!(err.message, "Upload failed");
}

#[tokio::test]
async fn upload_rejects_non_json_response() {
    let server = MockServer::start().await;
    let page = "<html>".to_string() + &"x".repeat(500);
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(502).set_body_raw(page, "text/html"))
        .mount(&server)
        .await;

    let (_temp, file) = csv_fixture();
    let err = api_for(&server).upload(&file).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::NonJsonResponse);
    let prefix = "Server returned non-JSON response: ";
    assert!(err.message.starts_with(prefix));
    assert_eq!(err.message.len(), prefix.len() + 200);
}

#[tokio::test]
async fn upload_of_missing_file_never_hits_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let err = api_for(&server)
        .upload(&temp.path().join("missing.csv"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Io);
}

#[tokio::test]
async fn status_parses_processing_and_error_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing", "progress": 4, "total": 10
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/job-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error", "error": "llm unavailable"
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let processing = api.status("job-1").await.unwrap();
    assert_eq!(processing.status, "processing");
    assert_eq!(processing.progress, Some(4));
    assert_eq!(processing.total, Some(10));
    assert!(!processing.is_terminal());

    let failed = api.status("job-2").await.unwrap();
    assert!(failed.is_terminal());
    assert_eq!(failed.progress, None);
    assert_eq!(failed.error.as_deref(), Some("llm unavailable"));
}

#[tokio::test]
async fn status_maps_not_found_and_non_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Job not found" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/proxy"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("Bad gateway", "text/plain"))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.status("gone").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(err.message, "Job not found");

    let err = api.status("proxy").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::NonJsonResponse);
}

#[tokio::test]
async fn job_ids_are_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "processing" })))
        .expect(1)
        .mount(&server)
        .await;

    let status = api_for(&server).status("a/b").await.unwrap();
    assert_eq!(status.progress, None);
}

#[tokio::test]
async fn results_accept_nulls_and_numbers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "business_name": "Acme",
                "business_address": "1 Main St",
                "contact_numbers": "555-0100, 555-0101",
                "search_resources": "acme.example"
            },
            {
                "business_name": 42,
                "business_address": null,
                "contact_numbers": ""
            }
        ])))
        .mount(&server)
        .await;

    let rows = api_for(&server).results("job-1").await.unwrap();
    assert_eq!(
        rows,
        vec![
            ResultRecord {
                business_name: Some("Acme".to_string()),
                business_address: Some("1 Main St".to_string()),
                contact_numbers: Some("555-0100, 555-0101".to_string()),
                search_resources: Some("acme.example".to_string()),
            },
            ResultRecord {
                business_name: Some("42".to_string()),
                business_address: None,
                contact_numbers: Some(String::new()),
                search_resources: None,
            },
        ]
    );
}

#[tokio::test]
async fn download_returns_bytes_and_enforces_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/job-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("business_name\nAcme\n", "application/octet-stream"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let bytes = api.download("job-1").await.unwrap();
    assert_eq!(&bytes[..], b"business_name\nAcme\n");

    let err = api.download("missing").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));

    let small = ReqwestJobApi::new(&ClientSettings {
        base_url: server.uri(),
        max_download_bytes: 4,
        ..ClientSettings::default()
    })
    .unwrap();
    let err = small.download("job-1").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 4, .. }));
}

#[tokio::test]
async fn slow_status_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "status": "processing" })),
        )
        .mount(&server)
        .await;

    let api = ReqwestJobApi::new(&ClientSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    })
    .unwrap();
    let err = api.status("slow").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestJobApi::new(&ClientSettings {
        base_url: "not a url".to_string(),
        ..ClientSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
