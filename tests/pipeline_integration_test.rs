//! End-to-end tests of a report run
//!
//! The in-memory tests drive the public pipeline types with fake backends;
//! the mockito test goes through the real HTTP clients.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockito::Matcher;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use transfer_report::adapters::blob::ObjectStore;
use transfer_report::adapters::credential::StaticTokenSource;
use transfer_report::adapters::loganalytics::{
    LogsQueryBackend, QueryColumn, QueryTable, QueryTimespan,
};
use transfer_report::config::load_config_from_str;
use transfer_report::core::query::QueryGateway;
use transfer_report::core::report::{ArtifactPublisher, ReportOrchestrator, RunOutcome};
use transfer_report::core::telemetry::TransferAssembler;
use transfer_report::domain::{QueryError, ReporterError, Result};

const COLUMNS: [&str; 10] = [
    "TransferId",
    "CaseId",
    "Username",
    "TransferDirection",
    "InitiatedTime",
    "CompletedTime",
    "TotalBytes",
    "TotalFiles",
    "TransferredFiles",
    "ErrorFiles",
];

const HEADER_LINE: &str = "TransferId,CaseId,Username,TransferDirection,StartedTime,CompletedTime,Duration,TotalFiles,TransferredFiles,ErrorFiles,TotalMegaBytesTransferred,AverageTransferSpeedMbps,TransferStatus";

fn table(rows: Vec<Vec<Value>>) -> QueryTable {
    QueryTable {
        name: "PrimaryResult".to_string(),
        columns: COLUMNS
            .iter()
            .map(|name| QueryColumn {
                name: name.to_string(),
                column_type: "string".to_string(),
            })
            .collect(),
        rows,
    }
}

fn sample_rows() -> Vec<Vec<Value>> {
    vec![
        vec![
            json!("t-2"),
            json!("CASE-002"),
            json!("bob"),
            json!("Upload"),
            json!("2024-01-15T10:00:00Z"),
            json!("2024-01-15T10:00:04Z"),
            json!(2_097_152.0),
            json!(10),
            json!(7),
            json!(3),
        ],
        vec![
            json!("t-1"),
            json!("CASE-001"),
            json!("Smith, Alice"),
            json!("Download"),
            json!("2024-01-15T08:00:00Z"),
            json!("2024-01-15T10:00:00Z"),
            json!(183_600_000.0),
            json!(5),
            json!(5),
            json!(0),
        ],
    ]
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 23, 30, 0).unwrap()
}

enum Reply {
    Rows(Vec<Vec<Value>>),
    Status(u16),
}

struct FakeBackend {
    reply: Reply,
    calls: Mutex<Vec<(String, QueryTimespan)>>,
}

impl FakeBackend {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LogsQueryBackend for FakeBackend {
    async fn query_workspace(
        &self,
        workspace_id: &str,
        _query: &str,
        timespan: &QueryTimespan,
    ) -> Result<QueryTable> {
        self.calls
            .lock()
            .unwrap()
            .push((workspace_id.to_string(), *timespan));
        match &self.reply {
            Reply::Rows(rows) => Ok(table(rows.clone())),
            Reply::Status(status) => Err(QueryError::Backend {
                status: *status,
                message: "rejected".to_string(),
            }
            .into()),
        }
    }
}

#[derive(Default)]
struct MemoryStore {
    containers: Mutex<Vec<String>>,
    objects: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn create_container_if_not_exists(&self, container: &str) -> Result<()> {
        let mut containers = self.containers.lock().unwrap();
        if !containers.iter().any(|c| c == container) {
            containers.push(container.to_string());
        }
        Ok(())
    }

    async fn upload_overwrite(&self, container: &str, path: &str, content: &[u8]) -> Result<()> {
        let mut objects = self.objects.lock().unwrap();
        objects.retain(|(c, p, _)| !(c == container && p == path));
        objects.push((
            container.to_string(),
            path.to_string(),
            String::from_utf8_lossy(content).to_string(),
        ));
        Ok(())
    }
}

fn orchestrator(backend: Arc<FakeBackend>, store: Arc<MemoryStore>) -> ReportOrchestrator {
    let gateway = QueryGateway::new(backend, "ws-1", 1.0).unwrap();
    ReportOrchestrator::new(
        TransferAssembler::new(gateway),
        ArtifactPublisher::new(store),
        "reports",
    )
    .unwrap()
    .with_clock(Arc::new(fixed_now))
}

#[tokio::test]
async fn test_run_publishes_dated_csv() {
    let backend = FakeBackend::new(Reply::Rows(sample_rows()));
    let store = Arc::new(MemoryStore::default());

    let outcome = orchestrator(backend.clone(), store.clone())
        .run_once()
        .await
        .unwrap();

    let objects = store.objects.lock().unwrap();
    assert_eq!(objects.len(), 1);
    let (container, path, content) = &objects[0];
    assert_eq!(container, "reports");
    assert_eq!(path, "2024-01/LCC_Transfer_Report_2024-01-15.csv");

    let expected = format!(
        "{HEADER_LINE}\n\
         t-2,CASE-002,bob,Upload,2024-01-15T10:00:00Z,2024-01-15T10:00:04Z,0m 4s,10,7,3,2,0.5,Partial\n\
         t-1,CASE-001,\"Smith, Alice\",Download,2024-01-15T08:00:00Z,2024-01-15T10:00:00Z,120m 0s,5,5,0,175.095,0.024,Success\n"
    );
    assert_eq!(content, &expected);

    assert_eq!(
        outcome,
        RunOutcome::Published {
            object_path: path.clone(),
            record_count: 2,
            bytes: expected.len(),
        }
    );
    assert_eq!(store.containers.lock().unwrap().as_slice(), ["reports"]);

    let calls = backend.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "ws-1");
}

#[tokio::test]
async fn test_second_run_same_day_overwrites() {
    let backend = FakeBackend::new(Reply::Rows(sample_rows()));
    let store = Arc::new(MemoryStore::default());
    let orchestrator = orchestrator(backend, store.clone());

    orchestrator.run_once().await.unwrap();
    orchestrator.run_once().await.unwrap();

    assert_eq!(store.objects.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_window_writes_nothing() {
    let backend = FakeBackend::new(Reply::Rows(Vec::new()));
    let store = Arc::new(MemoryStore::default());

    let outcome = orchestrator(backend, store.clone())
        .run_once()
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::NoData);
    assert!(store.objects.lock().unwrap().is_empty());
    assert!(store.containers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_access_denied_fails_run() {
    let backend = FakeBackend::new(Reply::Status(403));
    let store = Arc::new(MemoryStore::default());

    let err = orchestrator(backend, store.clone())
        .run_once()
        .await
        .unwrap_err();

    assert!(err.is_access_denied());
    assert!(store.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_backend_failure_is_treated_as_no_data() {
    let backend = FakeBackend::new(Reply::Status(500));
    let store = Arc::new(MemoryStore::default());

    let outcome = orchestrator(backend, store.clone())
        .run_once()
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::NoData);
    assert!(store.objects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dry_run_renders_local_copy_only() {
    let dir = tempfile::TempDir::new().unwrap();
    let local = dir.path().join("report.csv");
    let backend = FakeBackend::new(Reply::Rows(sample_rows()));
    let store = Arc::new(MemoryStore::default());

    let outcome = orchestrator(backend, store.clone())
        .with_dry_run(true)
        .with_local_output(&local)
        .run_once()
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::DryRun { record_count: 2, .. }));
    assert!(store.objects.lock().unwrap().is_empty());

    let written = std::fs::read_to_string(&local).unwrap();
    assert!(written.starts_with(HEADER_LINE));
    assert_eq!(written.lines().count(), 3);
}

#[tokio::test]
async fn test_query_window_matches_configuration() {
    let backend = FakeBackend::new(Reply::Rows(Vec::new()));
    let gateway = QueryGateway::new(backend.clone(), "ws-1", 0.5).unwrap();

    let before = Utc::now();
    gateway
        .execute::<Value>("AppEvents | take 1", 0.5)
        .await
        .unwrap();
    let after = Utc::now();

    let calls = backend.calls.lock().unwrap();
    let span = &calls[0].1;
    assert!(span.end >= before && span.end <= after);
    assert_eq!((span.end - span.start).num_hours(), 12);
}

#[tokio::test]
async fn test_invalid_window_rejected_before_query() {
    let backend = FakeBackend::new(Reply::Rows(sample_rows()));
    let gateway = QueryGateway::new(backend.clone(), "ws-1", 1.0).unwrap();

    let err = gateway
        .execute::<Value>("AppEvents", 0.0)
        .await
        .unwrap_err();

    assert!(matches!(err, ReporterError::Configuration(_)));
    assert!(backend.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_run_against_http_endpoints() {
    let mut server = mockito::Server::new_async().await;

    let body = json!({
        "tables": [{
            "name": "PrimaryResult",
            "columns": COLUMNS
                .iter()
                .map(|name| json!({"name": name, "type": "string"}))
                .collect::<Vec<_>>(),
            "rows": sample_rows(),
        }]
    });

    let query_mock = server
        .mock("POST", "/v1/workspaces/ws-1/query")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let container_mock = server
        .mock("PUT", "/reports")
        .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
        .with_status(409)
        .with_header("x-ms-error-code", "ContainerAlreadyExists")
        .create_async()
        .await;

    let upload_mock = server
        .mock("PUT", "/reports/2024-01/LCC_Transfer_Report_2024-01-15.csv")
        .match_header("x-ms-blob-type", "BlockBlob")
        .match_body(Matcher::Regex("^TransferId,CaseId".to_string()))
        .with_status(201)
        .create_async()
        .await;

    let config = load_config_from_str(&format!(
        r#"
[telemetry]
workspace_id = "ws-1"
time_range_days = 1.0
endpoint = "{url}"

[storage]
account_url = "{url}"
container_name = "reports"

[logging]
local_enabled = false
"#,
        url = server.url()
    ))
    .unwrap();

    let orchestrator = ReportOrchestrator::from_config_with_tokens(
        &config,
        Arc::new(StaticTokenSource::new("test-token")),
    )
    .unwrap()
    .with_clock(Arc::new(fixed_now));

    let outcome = orchestrator.run_once().await.unwrap();

    query_mock.assert_async().await;
    container_mock.assert_async().await;
    upload_mock.assert_async().await;
    assert_eq!(outcome.record_count(), 2);
    assert_eq!(
        outcome.object_path(),
        Some("2024-01/LCC_Transfer_Report_2024-01-15.csv")
    );
}
