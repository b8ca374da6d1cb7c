//! Report rendering, naming, publishing and the per-run orchestrator

pub mod naming;
pub mod orchestrator;
pub mod publisher;
pub mod render;

pub use naming::{object_path, REPORT_PREFIX};
pub use orchestrator::{Clock, ReportOrchestrator, RunOutcome};
pub use publisher::ArtifactPublisher;
pub use render::{escape_cell, render_report, HEADER};
