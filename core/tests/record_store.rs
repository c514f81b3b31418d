//! Record store tests: wholesale replacement and best-effort failure.

use dashboard_core::{
    config::DashboardConfig,
    error::DashError,
    model::{Customer, RecordDocument, RecordSet, Transaction},
    source::{FailingSource, HttpRecordSource, RecordSource, StaticSource},
    store::{LoadOutcome, RecordStore},
    types::RecordId,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

fn records(names: &[&str]) -> RecordSet {
    RecordSet {
        customers: names
            .iter()
            .enumerate()
            .map(|(i, n)| Customer::new(i as i64 + 1, *n))
            .collect(),
        transactions: vec![Transaction::new(1, "2024-01-01", 5.0)],
    }
}

/// Serves one canned HTTP reply on a loopback port.
/// Returns the endpoint URL and a handle yielding the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = sock.read(&mut buf).await.expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let reply = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        sock.write_all(reply.as_bytes()).await.expect("write reply");
        let _ = sock.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });
    (format!("http://{addr}/b/test"), handle)
}

fn http_config(endpoint: String, credential_env: &str) -> DashboardConfig {
    DashboardConfig {
        endpoint,
        credential_env: credential_env.into(),
        ..DashboardConfig::default_test()
    }
}

const DOCUMENT: &str = r#"{"record":{"customers":[{"id":1,"name":"Ann"},{"id":2,"name":"Bo"}],"transactions":[{"customer_id":1,"date":"2024-01-02","amount":10},{"customer_id":1,"date":"2024-01-03","amount":7}]}}"#;

#[test]
fn new_store_is_empty_and_loading() {
    let store = RecordStore::new();
    assert!(store.is_loading());
    assert!(store.snapshot().customers().is_empty());
    assert!(store.snapshot().loaded_at.is_none());
}

#[tokio::test]
async fn successful_load_replaces_snapshot() {
    let mut store = RecordStore::new();
    let outcome = store.load(&StaticSource::new(records(&["Ann", "Bo"]))).await;

    assert_eq!(outcome, LoadOutcome::Replaced { customers: 2, transactions: 1 });
    assert!(!store.is_loading());
    assert_eq!(store.snapshot().customers().len(), 2);
    assert!(store.snapshot().loaded_at.is_some());

    // A second load replaces wholesale, it does not merge.
    store.load(&StaticSource::new(records(&["Cy"]))).await;
    let snap = store.snapshot();
    assert_eq!(snap.customers().len(), 1);
    assert_eq!(snap.customers()[0].name, "Cy");
}

#[tokio::test]
async fn failed_first_load_leaves_store_empty() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut store = RecordStore::new();

    let outcome = store.load(&FailingSource { status: 500 }).await;

    assert_eq!(outcome, LoadOutcome::Kept);
    assert!(!store.is_loading(), "loading must clear on failure");
    assert!(store.snapshot().customers().is_empty());
    assert!(store.snapshot().transactions().is_empty());
}

#[tokio::test]
async fn failed_reload_keeps_previous_snapshot() {
    let mut store = RecordStore::new();
    store.load(&StaticSource::new(records(&["Ann", "Bo"]))).await;
    let before = store.snapshot();

    let outcome = store.load(&FailingSource { status: 503 }).await;

    assert_eq!(outcome, LoadOutcome::Kept);
    assert!(!store.is_loading());
    let after = store.snapshot();
    assert!(std::sync::Arc::ptr_eq(&before, &after), "snapshot was touched");
}

#[tokio::test]
async fn unreachable_endpoint_is_swallowed() {
    let source = HttpRecordSource::new(&DashboardConfig::default_test()).expect("build source");
    let mut store = RecordStore::new();

    let outcome = store.load(&source).await;

    assert_eq!(outcome, LoadOutcome::Kept);
    assert!(!store.is_loading());
    assert!(store.snapshot().customers().is_empty());
}

#[test]
fn document_without_arrays_decodes_as_empty() {
    let set = RecordDocument::from_slice(br#"{"record":{}}"#).unwrap();
    assert!(set.customers.is_empty() && set.transactions.is_empty());

    let set = RecordDocument::from_slice(br#"{"metadata":{"id":"abc"}}"#).unwrap();
    assert_eq!(set, RecordSet::default());

    let set = RecordDocument::from_slice(
        br#"{"record":{"customers":[{"id":1,"name":"Ann"},{"id":"c-2","name":"Bo"}]}}"#,
    )
    .unwrap();
    assert_eq!(set.customers[0].id, RecordId::Num(1));
    assert_eq!(set.customers[1].id, RecordId::from("c-2"));
    assert!(set.transactions.is_empty());

    // An explicit null is empty too, not a decode failure.
    let set = RecordDocument::from_slice(
        br#"{"record":{"customers":[{"id":1,"name":"Ann"}],"transactions":null}}"#,
    )
    .unwrap();
    assert_eq!(set.customers.len(), 1);
    assert!(set.transactions.is_empty());

    let set = RecordDocument::from_slice(br#"{"record":{"customers":null,"transactions":null}}"#)
        .unwrap();
    assert_eq!(set, RecordSet::default());
}

#[test]
fn unparseable_body_is_a_fetch_failure() {
    let err = StaticSource::from_json("<html>Bad gateway</html>").unwrap_err();
    assert!(matches!(err, DashError::Decode(_)));
    assert!(err.is_fetch_failure());

    assert!(DashError::Status { status: 404 }.is_fetch_failure());
    assert!(DashError::TaskAborted.is_fetch_failure());
    assert!(!DashError::Config("endpoint must be set".into()).is_fetch_failure());
}

#[test]
fn source_rejects_config_without_endpoint() {
    let err = HttpRecordSource::new(&DashboardConfig::default()).err().expect("should fail");
    assert!(matches!(err, DashError::Config(_)));
}

#[tokio::test]
async fn http_source_sends_credential_and_loads_document() {
    std::env::set_var("DASHBOARD_HTTP_TEST_KEY", "s3cret-http");
    let (endpoint, server) = serve_once("200 OK", DOCUMENT).await;
    let source = HttpRecordSource::new(&http_config(endpoint, "DASHBOARD_HTTP_TEST_KEY"))
        .expect("build source");
    let mut store = RecordStore::new();

    let outcome = store.load(&source).await;

    assert_eq!(outcome, LoadOutcome::Replaced { customers: 2, transactions: 2 });
    let snap = store.snapshot();
    assert_eq!(snap.total_for(&RecordId::Num(1)), 17.0);
    assert_eq!(snap.customers()[1].name, "Bo");

    // Compared lower-cased; header names go out in lower case.
    let request = server.await.expect("server task").to_lowercase();
    assert!(request.starts_with("get /b/test "), "unexpected request line: {request}");
    assert!(
        request.contains("x-master-key: s3cret-http"),
        "credential header missing from request:\n{request}"
    );
}

#[tokio::test]
async fn http_source_without_credential_sends_no_header() {
    let (endpoint, server) = serve_once("200 OK", DOCUMENT).await;
    let source = HttpRecordSource::new(&http_config(endpoint, "DASHBOARD_HTTP_TEST_KEY_UNSET"))
        .expect("build source");

    let records = source.fetch().await.expect("fetch");

    assert_eq!(records.customers.len(), 2);
    let request = server.await.expect("server task").to_lowercase();
    assert!(!request.contains("x-master-key"), "unexpected credential:\n{request}");
}

#[tokio::test]
async fn http_error_status_is_a_fetch_failure() {
    let (endpoint, _server) = serve_once("503 Service Unavailable", "").await;
    let source = HttpRecordSource::new(&http_config(endpoint, "DASHBOARD_HTTP_TEST_KEY_UNSET"))
        .expect("build source");
    let err = source.fetch().await.unwrap_err();
    assert!(matches!(err, DashError::Status { status: 503 }), "got {err}");
    assert!(err.is_fetch_failure());

    let (endpoint, _server) = serve_once("503 Service Unavailable", "").await;
    let source = HttpRecordSource::new(&http_config(endpoint, "DASHBOARD_HTTP_TEST_KEY_UNSET"))
        .expect("build source");
    let mut store = RecordStore::new();
    store.load(&StaticSource::new(records(&["Ann"]))).await;

    let outcome = store.load(&source).await;

    assert_eq!(outcome, LoadOutcome::Kept);
    assert!(!store.is_loading());
    assert_eq!(store.snapshot().customers()[0].name, "Ann");
}
