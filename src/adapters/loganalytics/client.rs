//! Log Analytics workspace query client
//!
//! Talks to the Azure Monitor Log Analytics query API
//! (`POST {endpoint}/v1/workspaces/{workspace_id}/query`) with an Azure AD
//! bearer token. Application Insights events land in the workspace's
//! `AppEvents` table, which is what the transfer report queries.

use super::models::{ErrorResponse, QueryRequest, QueryResponse, QueryTable, QueryTimespan};
use crate::adapters::credential::{AccessTokenSource, LOG_ANALYTICS_SCOPE};
use crate::adapters::http::{build_http_client, join_segments, parse_base_url};
use crate::config::TelemetryConfig;
use crate::domain::{QueryError, ReporterError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Telemetry backend able to run a workspace query
///
/// Implementations return the primary result table. A backend that answered
/// with a non-success status must report it as [`QueryError::Backend`] so the
/// status code survives to the caller.
#[async_trait]
pub trait LogsQueryBackend: Send + Sync {
    async fn query_workspace(
        &self,
        workspace_id: &str,
        query: &str,
        timespan: &QueryTimespan,
    ) -> Result<QueryTable>;
}

/// REST client for the Log Analytics query API
pub struct LogAnalyticsClient {
    endpoint: Url,
    http_client: Client,
    tokens: Arc<dyn AccessTokenSource>,
}

impl LogAnalyticsClient {
    /// Create a client from the telemetry configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint is not a valid URL or the
    /// HTTP client cannot be built.
    pub fn new(config: &TelemetryConfig, tokens: Arc<dyn AccessTokenSource>) -> Result<Self> {
        let endpoint = parse_base_url("telemetry.endpoint", &config.endpoint)?;
        let http_client = build_http_client(config.request_timeout_seconds)?;

        Ok(Self {
            endpoint,
            http_client,
            tokens,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LogsQueryBackend for LogAnalyticsClient {
    async fn query_workspace(
        &self,
        workspace_id: &str,
        query: &str,
        timespan: &QueryTimespan,
    ) -> Result<QueryTable> {
        let url = join_segments(&self.endpoint, ["v1", "workspaces", workspace_id, "query"])?;
        let token = self.tokens.bearer_token(LOG_ANALYTICS_SCOPE).await?;

        let body = QueryRequest {
            query,
            timespan: timespan.to_iso8601(),
        };

        tracing::debug!(
            url = %url,
            timespan = %body.timespan,
            "Sending Log Analytics query"
        );

        let response = self
            .http_client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryError::Unknown(format!("Log Analytics request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorResponse>(&raw) {
                Ok(parsed) if !parsed.error.message.is_empty() => {
                    format!("{}: {}", parsed.error.code, parsed.error.message)
                }
                _ => raw,
            };
            return Err(ReporterError::Query(QueryError::Backend {
                status: status.as_u16(),
                message,
            }));
        }

        let parsed: QueryResponse = response.json().await.map_err(|e| {
            QueryError::Unknown(format!("Invalid Log Analytics response: {e}"))
        })?;

        let table = parsed.tables.into_iter().next().unwrap_or_default();

        tracing::debug!(
            table = %table.name,
            columns = table.columns.len(),
            rows = table.rows.len(),
            "Log Analytics query returned"
        );

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::credential::StaticTokenSource;
    use chrono::{Duration, Utc};
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server_url: &str) -> LogAnalyticsClient {
        let config = TelemetryConfig {
            workspace_id: "ws-1".to_string(),
            time_range_days: 1.0,
            endpoint: server_url.to_string(),
            request_timeout_seconds: 5,
        };
        LogAnalyticsClient::new(&config, Arc::new(StaticTokenSource::new("test-token"))).unwrap()
    }

    fn timespan() -> QueryTimespan {
        let end = Utc::now();
        QueryTimespan::new(end - Duration::days(1), end)
    }

    #[tokio::test]
    async fn test_query_returns_primary_table() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/workspaces/ws-1/query")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::PartialJson(json!({"query": "AppEvents | take 1"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "tables": [{
                        "name": "PrimaryResult",
                        "columns": [{"name": "TransferId", "type": "string"}],
                        "rows": [["t-1"], ["t-2"]]
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let table = client
            .query_workspace("ws-1", "AppEvents | take 1", &timespan())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(table.name, "PrimaryResult");
        assert_eq!(table.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_query_forbidden_maps_to_backend_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/workspaces/ws-1/query")
            .with_status(403)
            .with_body(
                json!({"error": {"code": "InsufficientAccessError", "message": "denied"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client
            .query_workspace("ws-1", "AppEvents", &timespan())
            .await
            .unwrap_err();

        match err {
            ReporterError::Query(QueryError::Backend { status, message }) => {
                assert_eq!(status, 403);
                assert!(message.contains("InsufficientAccessError"));
            }
            other => panic!("Expected backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_query_invalid_json_is_unknown_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/workspaces/ws-1/query")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client
            .query_workspace("ws-1", "AppEvents", &timespan())
            .await
            .unwrap_err();

        assert!(matches!(err, ReporterError::Query(QueryError::Unknown(_))));
    }

    #[tokio::test]
    async fn test_query_without_tables_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/workspaces/ws-1/query")
            .with_status(200)
            .with_body(r#"{"tables": []}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let table = client
            .query_workspace("ws-1", "AppEvents", &timespan())
            .await
            .unwrap();
        assert!(table.is_empty());
    }
}
