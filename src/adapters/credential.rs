//! Azure AD access tokens
//!
//! Both the Log Analytics query API and the Blob REST API accept an Azure AD
//! bearer token. [`AccessTokenSource`] hides how that token is obtained so the
//! HTTP adapters can be exercised against a local mock server.

use crate::config::{AuthType, AzureConfig};
use crate::domain::{ReporterError, Result};
use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use azure_identity::{ClientSecretCredential, ManagedIdentityCredential};
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Token scope of the Log Analytics query API
pub const LOG_ANALYTICS_SCOPE: &str = "https://api.loganalytics.io/.default";

/// Token scope of Azure Storage
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

/// Token scope of the Azure Monitor Logs Ingestion API
pub const MONITOR_SCOPE: &str = "https://monitor.azure.com/.default";

/// Source of bearer tokens for a given scope
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Returns a bearer token valid for `scope`
    ///
    /// # Errors
    ///
    /// Returns [`ReporterError::Authentication`] if no token can be acquired.
    async fn bearer_token(&self, scope: &str) -> Result<String>;
}

/// Token source backed by an `azure_identity` credential
pub struct AzureTokenSource {
    credential: Arc<dyn TokenCredential>,
}

impl AzureTokenSource {
    /// Builds the credential selected by `azure.auth_type`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if required client-secret settings are
    /// missing, or an authentication error if the credential cannot be created.
    pub fn from_config(config: &AzureConfig) -> Result<Self> {
        let credential: Arc<dyn TokenCredential> = match config.auth_type {
            AuthType::ClientSecret => {
                let tenant_id = config.tenant_id.as_deref().ok_or_else(|| {
                    ReporterError::Configuration(
                        "azure.tenant_id is required for client_secret authentication".to_string(),
                    )
                })?;
                let client_id = config.client_id.clone().ok_or_else(|| {
                    ReporterError::Configuration(
                        "azure.client_id is required for client_secret authentication".to_string(),
                    )
                })?;
                let client_secret = config.client_secret.as_ref().ok_or_else(|| {
                    ReporterError::Configuration(
                        "azure.client_secret is required for client_secret authentication"
                            .to_string(),
                    )
                })?;

                let secret = azure_core::credentials::Secret::new(
                    client_secret.expose_secret().as_ref().to_string(),
                );

                let credential = ClientSecretCredential::new(tenant_id, client_id, secret, None)
                    .map_err(|e| {
                        ReporterError::Authentication(format!(
                            "Failed to create Azure AD credential: {e}"
                        ))
                    })?;
                credential as Arc<dyn TokenCredential>
            }
            AuthType::ManagedIdentity => {
                let credential = ManagedIdentityCredential::new(None).map_err(|e| {
                    ReporterError::Authentication(format!(
                        "Failed to create managed identity credential: {e}"
                    ))
                })?;
                credential as Arc<dyn TokenCredential>
            }
        };

        tracing::debug!(auth_type = ?config.auth_type, "Azure credential initialized");

        Ok(Self { credential })
    }
}

#[async_trait]
impl AccessTokenSource for AzureTokenSource {
    async fn bearer_token(&self, scope: &str) -> Result<String> {
        let token = self
            .credential
            .get_token(&[scope], None)
            .await
            .map_err(|e| {
                ReporterError::Authentication(format!(
                    "Failed to acquire Azure AD token for {scope}: {e}"
                ))
            })?;

        Ok(token.token.secret().to_string())
    }
}

/// Fixed token, for local emulators and tests
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for StaticTokenSource {
    async fn bearer_token(&self, _scope: &str) -> Result<String> {
        Ok(self.token.clone())
    }
}
