//! Shared HTTP plumbing for the Azure REST adapters

use crate::domain::{ReporterError, Result};
use std::time::Duration;
use url::Url;

/// Builds a reqwest client with the configured request timeout
pub fn build_http_client(timeout_seconds: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .connect_timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| ReporterError::Configuration(format!("Failed to create HTTP client: {e}")))
}

/// Parses a base endpoint URL
pub fn parse_base_url(field: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| {
        ReporterError::Configuration(format!("{field} is not a valid URL '{value}': {e}"))
    })
}

/// Appends percent-encoded path segments to a base URL
///
/// A trailing slash on the base is ignored, and empty segments are skipped.
pub fn join_segments<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            ReporterError::Configuration(format!("URL cannot be used as a base: {base}"))
        })?;
        path.pop_if_empty();
        for segment in segments.into_iter().filter(|s| !s.is_empty()) {
            path.push(segment);
        }
    }
    Ok(url)
}
