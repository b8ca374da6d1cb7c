//! Domain error types
//!
//! This module defines the error hierarchy for the report generator.
//! Errors are domain-specific and don't expose third-party client types.

use thiserror::Error;

/// HTTP status returned by the telemetry backend when the caller lacks permission
pub const ACCESS_DENIED_STATUS: u16 = 403;

/// Main error type
///
/// This is the primary error type used throughout the application.
/// It wraps the query and publish error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// Invalid or missing required setting
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller passed an empty or malformed argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Telemetry query errors
    #[error("Telemetry query error: {0}")]
    Query(#[from] QueryError),

    /// Blob storage errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// Azure AD token acquisition errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Azure logging errors
    #[error("Azure logging error: {0}")]
    AzureLogging(String),
}

/// Telemetry backend errors
///
/// Raised by the query gateway when the Log Analytics workspace query fails.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The backend answered with a non-success status
    #[error("Backend request failed with status {status}: {message}")]
    Backend { status: u16, message: String },

    /// Transport, decoding or any other unexpected failure
    #[error("Unexpected query failure: {0}")]
    Unknown(String),
}

impl QueryError {
    /// Status code reported by the backend, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            QueryError::Backend { status, .. } => Some(*status),
            QueryError::Unknown(_) => None,
        }
    }

    /// True when the backend refused the request for lack of permission
    pub fn is_access_denied(&self) -> bool {
        self.status() == Some(ACCESS_DENIED_STATUS)
    }
}

/// Blob storage errors
#[derive(Debug, Error)]
pub enum PublishError {
    /// Container could not be created or verified
    #[error("Failed to create container '{container}': {message}")]
    ContainerCreation {
        container: String,
        status: Option<u16>,
        message: String,
    },

    /// Blob upload failed
    #[error("Failed to upload '{path}' to container '{container}': {message}")]
    Upload {
        container: String,
        path: String,
        status: Option<u16>,
        message: String,
    },
}

impl ReporterError {
    /// True for a telemetry access-denied failure
    pub fn is_access_denied(&self) -> bool {
        matches!(self, ReporterError::Query(e) if e.is_access_denied())
    }
}

impl From<std::io::Error> for ReporterError {
    fn from(err: std::io::Error) -> Self {
        ReporterError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReporterError {
    fn from(err: serde_json::Error) -> Self {
        ReporterError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ReporterError {
    fn from(err: toml::de::Error) -> Self {
        ReporterError::Configuration(format!("TOML parse error: {err}"))
    }
}
