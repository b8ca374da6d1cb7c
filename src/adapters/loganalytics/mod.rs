//! Azure Log Analytics (Application Insights workspace) integration

pub mod client;
pub mod models;

pub use client::{LogAnalyticsClient, LogsQueryBackend};
pub use models::{QueryColumn, QueryTable, QueryTimespan};
