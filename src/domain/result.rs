//! Result type alias
//!
//! A convenient Result type that uses [`ReporterError`] as the error type.

use super::errors::ReporterError;

/// Result type alias for report generator operations
///
/// # Examples
///
/// ```
/// use transfer_report::domain::result::Result;
/// use transfer_report::domain::errors::ReporterError;
///
/// fn failing_function() -> Result<()> {
///     Err(ReporterError::InvalidArgument("query cannot be empty".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ReporterError>;
