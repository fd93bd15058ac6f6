use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use skiptrace_client::{
    poll_until_terminal, ClientEvent, ClientSettings, EventSink, FailureKind, ReqwestJobApi,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<ClientEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: ClientEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn statuses(events: &[ClientEvent]) -> Vec<Result<String, FailureKind>> {
    events
        .iter()
        .map(|event| match event {
            ClientEvent::Status { result, .. } => result
                .as_ref()
                .map(|payload| payload.status.clone())
                .map_err(|err| err.kind.clone()),
            other => panic!("unexpected event {other:?}"),
        })
        .collect()
}

fn api_for(server: &MockServer) -> ReqwestJobApi {
    ReqwestJobApi::new(&ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .unwrap()
}

#[tokio::test]
async fn polls_until_completed_then_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing", "progress": 1, "total": 2
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed", "progress": 2, "total": 2
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    tokio::time::timeout(
        Duration::from_secs(5),
        poll_until_terminal(&api, "job-1", Duration::from_millis(20), &cancel, &sink),
    )
    .await
    .expect("poller stops on its own");

    assert_eq!(
        statuses(&sink.take()),
        vec![
            Ok("processing".to_string()),
            Ok("processing".to_string()),
            Ok("completed".to_string()),
        ]
    );
}

#[tokio::test]
async fn failed_polls_are_reported_and_polling_continues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(502).set_body_raw("Bad gateway", "text/plain"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error", "error": "boom"
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    tokio::time::timeout(
        Duration::from_secs(5),
        poll_until_terminal(&api, "job-1", Duration::from_millis(20), &cancel, &sink),
    )
    .await
    .expect("poller stops on error status");

    assert_eq!(
        statuses(&sink.take()),
        vec![Err(FailureKind::NonJsonResponse), Ok("error".to_string())]
    );
}

#[tokio::test]
async fn first_poll_is_immediate_and_cancel_stops_loop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing", "progress": 0, "total": 10
        })))
        .mount(&server)
        .await;

    let api = Arc::new(api_for(&server));
    let sink = Arc::new(TestSink::default());
    let cancel = CancellationToken::new();

    let task = {
        let api = api.clone();
        let sink = sink.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            // A long interval: only the immediate tick can fire during the test.
            poll_until_terminal(
                api.as_ref(),
                "job-1",
                Duration::from_secs(60),
                &cancel,
                sink.as_ref(),
            )
            .await;
        })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("cancelled poller exits")
        .unwrap();

    assert_eq!(statuses(&sink.take()), vec![Ok("processing".to_string())]);
}

#[tokio::test]
async fn zero_interval_polls_at_the_minimum_delay() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing", "progress": 1, "total": 2
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed", "progress": 2, "total": 2
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    tokio::time::timeout(
        Duration::from_secs(5),
        poll_until_terminal(&api, "job-1", Duration::ZERO, &cancel, &sink),
    )
    .await
    .expect("poller runs with a zero interval");

    assert_eq!(
        statuses(&sink.take()),
        vec![Ok("processing".to_string()), Ok("completed".to_string())]
    );
}
