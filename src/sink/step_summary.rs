use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{Report, ReportingSink};

/// Appends the Markdown body to the workflow run summary file.
///
/// GitHub Actions exposes the target path in `GITHUB_STEP_SUMMARY`; outside
/// that environment the sink is simply not constructed.
pub struct StepSummarySink {
    path: PathBuf,
}

impl StepSummarySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var_os("GITHUB_STEP_SUMMARY").map(|p| Self::new(PathBuf::from(p)))
    }
}

#[async_trait]
impl ReportingSink for StepSummarySink {
    fn name(&self) -> &'static str {
        "step-summary"
    }

    async fn post(&self, report: &Report) -> Result<()> {
        debug!(path = %self.path.display(), check_name = %report.check_name, "appending step summary");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open step summary at {}", self.path.display()))?;
        writeln!(file, "{}", report.body)?;
        Ok(())
    }
}
