//! Azure Blob Storage REST client
//!
//! Uses two Blob service operations: Create Container and Put Blob (block
//! blob, single shot). Report files are small, so no block staging is needed.

use crate::adapters::credential::{AccessTokenSource, STORAGE_SCOPE};
use crate::adapters::http::{build_http_client, join_segments, parse_base_url};
use crate::config::StorageConfig;
use crate::domain::{PublishError, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::sync::Arc;
use url::Url;

/// Blob service REST API version sent with every request
pub const STORAGE_API_VERSION: &str = "2021-08-06";

/// Content type of uploaded report files
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const ERROR_CODE_HEADER: &str = "x-ms-error-code";
const CONTAINER_EXISTS_CODE: &str = "ContainerAlreadyExists";

/// Object storage able to hold published reports
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Ensures the container exists; an existing container is not an error
    async fn create_container_if_not_exists(&self, container: &str) -> Result<()>;

    /// Writes `content` at `path`, replacing any existing object
    async fn upload_overwrite(&self, container: &str, path: &str, content: &[u8]) -> Result<()>;
}

/// REST client for an Azure Storage account's Blob service
pub struct BlobStorageClient {
    account_url: Url,
    http_client: Client,
    tokens: Arc<dyn AccessTokenSource>,
}

impl BlobStorageClient {
    /// Create a client from the storage configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `account_url` is not a valid URL.
    pub fn new(config: &StorageConfig, tokens: Arc<dyn AccessTokenSource>) -> Result<Self> {
        let account_url = parse_base_url("storage.account_url", &config.account_url)?;
        let http_client = build_http_client(config.request_timeout_seconds)?;

        Ok(Self {
            account_url,
            http_client,
            tokens,
        })
    }

    fn blob_url(&self, container: &str, path: &str) -> Result<Url> {
        join_segments(
            &self.account_url,
            std::iter::once(container).chain(path.split('/')),
        )
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.tokens.bearer_token(STORAGE_SCOPE).await?;
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        Ok(request
            .bearer_auth(token)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header("x-ms-date", date))
    }
}

#[async_trait]
impl ObjectStore for BlobStorageClient {
    async fn create_container_if_not_exists(&self, container: &str) -> Result<()> {
        let mut url = join_segments(&self.account_url, [container])?;
        url.query_pairs_mut().append_pair("restype", "container");

        let request = self
            .authorize(
                self.http_client
                    .put(url)
                    .header(reqwest::header::CONTENT_LENGTH, 0),
            )
            .await
            .map_err(|e| PublishError::ContainerCreation {
                container: container.to_string(),
                status: None,
                message: e.to_string(),
            })?;

        let response = request
            .send()
            .await
            .map_err(|e| PublishError::ContainerCreation {
                container: container.to_string(),
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(container = %container, "Created blob container");
            return Ok(());
        }

        let error_code = response
            .headers()
            .get(ERROR_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status == StatusCode::CONFLICT && error_code.as_deref() == Some(CONTAINER_EXISTS_CODE) {
            tracing::debug!(container = %container, "Blob container already exists");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PublishError::ContainerCreation {
            container: container.to_string(),
            status: Some(status.as_u16()),
            message: error_code.unwrap_or(body),
        }
        .into())
    }

    async fn upload_overwrite(&self, container: &str, path: &str, content: &[u8]) -> Result<()> {
        let url = self.blob_url(container, path)?;
        let upload_error = |status: Option<u16>, message: String| PublishError::Upload {
            container: container.to_string(),
            path: path.to_string(),
            status,
            message,
        };

        let request = self
            .authorize(
                self.http_client
                    .put(url)
                    .header("x-ms-blob-type", "BlockBlob")
                    .header(reqwest::header::CONTENT_TYPE, CSV_CONTENT_TYPE)
                    .body(content.to_vec()),
            )
            .await
            .map_err(|e| upload_error(None, e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| upload_error(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_code = response
                .headers()
                .get(ERROR_CODE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            return Err(upload_error(Some(status.as_u16()), error_code.unwrap_or(body)).into());
        }

        tracing::debug!(
            container = %container,
            path = %path,
            bytes = content.len(),
            "Blob upload accepted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::credential::StaticTokenSource;
    use crate::domain::ReporterError;
    use mockito::Matcher;

    fn client_for(server_url: &str) -> BlobStorageClient {
        let config = StorageConfig {
            account_url: server_url.to_string(),
            container_name: "reports".to_string(),
            request_timeout_seconds: 5,
        };
        BlobStorageClient::new(&config, Arc::new(StaticTokenSource::new("blob-token"))).unwrap()
    }

    #[tokio::test]
    async fn test_create_container_created() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/reports")
            .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
            .match_header("authorization", "Bearer blob-token")
            .match_header("x-ms-version", STORAGE_API_VERSION)
            .with_status(201)
            .create_async()
            .await;

        let client = client_for(&server.url());
        client.create_container_if_not_exists("reports").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_container_already_exists() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/reports")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_header("x-ms-error-code", "ContainerAlreadyExists")
            .create_async()
            .await;

        let client = client_for(&server.url());
        assert!(client.create_container_if_not_exists("reports").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_container_other_conflict_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/reports")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_header("x-ms-error-code", "ContainerBeingDeleted")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client
            .create_container_if_not_exists("reports")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReporterError::Publish(PublishError::ContainerCreation {
                status: Some(409),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_upload_overwrite_puts_block_blob() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/reports/2024-01/LCC_Transfer_Report_2024-01-15.csv")
            .match_header("x-ms-blob-type", "BlockBlob")
            .match_header("content-type", CSV_CONTENT_TYPE)
            .match_body("TransferId\n")
            .with_status(201)
            .create_async()
            .await;

        let client = client_for(&server.url());
        client
            .upload_overwrite(
                "reports",
                "2024-01/LCC_Transfer_Report_2024-01-15.csv",
                b"TransferId\n",
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_failure_carries_path() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/reports/2024-01/report.csv")
            .with_status(403)
            .with_header("x-ms-error-code", "AuthorizationPermissionMismatch")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client
            .upload_overwrite("reports", "2024-01/report.csv", b"x")
            .await
            .unwrap_err();

        match err {
            ReporterError::Publish(PublishError::Upload {
                container,
                path,
                status,
                message,
            }) => {
                assert_eq!(container, "reports");
                assert_eq!(path, "2024-01/report.csv");
                assert_eq!(status, Some(403));
                assert_eq!(message, "AuthorizationPermissionMismatch");
            }
            other => panic!("Expected upload error, got {other:?}"),
        }
    }
}
