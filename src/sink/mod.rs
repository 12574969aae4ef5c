//! Reporting sinks.
//!
//! A sink persists or displays one rendered report. The core builds a
//! [`Report`] per report type (vulnerabilities, licenses) and posts it to
//! each configured sink exactly once; transport-level concerns such as
//! retries belong to the sink, never the core.

mod check_run;
mod console;
mod step_summary;

pub use check_run::CheckRunSink;
pub use console::ConsoleSink;
pub use step_summary::StepSummarySink;

use anyhow::Result;
use async_trait::async_trait;

use crate::output::SummaryTable;

/// One rendered report ready for posting.
#[derive(Debug, Clone)]
pub struct Report {
    /// Check-run title, e.g. "Dependency Review - Vulnerabilities".
    pub check_name: String,
    /// Commit the check result attaches to.
    pub sha: String,
    /// Rendered Markdown body.
    pub body: String,
    /// Structured rendering of the same data for tabular surfaces.
    pub tables: Vec<SummaryTable>,
    /// Whether this report represents a policy failure.
    pub failed: bool,
    /// Warning lines that do not fail the run (e.g. unknown licenses).
    pub warnings: Vec<String>,
}

#[async_trait]
pub trait ReportingSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn post(&self, report: &Report) -> Result<()>;
}
