//! External system integrations.
//!
//! This module provides adapters for the Azure services the report generator
//! talks to:
//!
//! - [`loganalytics`] - Log Analytics workspace query API (telemetry source)
//! - [`blob`] - Azure Blob Storage (report destination)
//! - [`credential`] - Azure AD bearer tokens shared by both
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. Each service sits behind a
//! trait ([`loganalytics::LogsQueryBackend`], [`blob::ObjectStore`],
//! [`credential::AccessTokenSource`]) so the core pipeline can be exercised
//! with in-memory fakes.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use transfer_report::adapters::blob::{BlobStorageClient, ObjectStore};
//! use transfer_report::adapters::credential::StaticTokenSource;
//! use transfer_report::config::StorageConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorageConfig {
//!     account_url: "http://127.0.0.1:10000/devstoreaccount1".to_string(),
//!     container_name: "reports".to_string(),
//!     request_timeout_seconds: 60,
//! };
//!
//! let store = BlobStorageClient::new(&config, Arc::new(StaticTokenSource::new("token")))?;
//! store.create_container_if_not_exists("reports").await?;
//! # Ok(())
//! # }
//! ```

pub mod blob;
pub mod credential;
pub mod http;
pub mod loganalytics;
