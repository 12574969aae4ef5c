use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{Report, ReportingSink};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("depreview/", env!("CARGO_PKG_VERSION"));

/// Posts a report as a completed GitHub check run on the head commit.
pub struct CheckRunSink {
    client: reqwest::Client,
    token: String,
    api_base: String,
    /// `owner/repo` slug.
    repo: String,
}

#[derive(Serialize)]
struct CheckRunPayload<'a> {
    name: &'a str,
    head_sha: &'a str,
    status: &'static str,
    conclusion: &'static str,
    output: CheckRunOutput<'a>,
}

#[derive(Serialize)]
struct CheckRunOutput<'a> {
    title: &'a str,
    summary: &'a str,
}

impl CheckRunSink {
    pub fn new(token: String, repo: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            api_base: DEFAULT_API_BASE.to_string(),
            repo: repo.into(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn payload<'a>(report: &'a Report) -> CheckRunPayload<'a> {
        CheckRunPayload {
            name: &report.check_name,
            head_sha: &report.sha,
            status: "completed",
            conclusion: if report.failed { "failure" } else { "success" },
            output: CheckRunOutput {
                title: &report.check_name,
                summary: &report.body,
            },
        }
    }
}

#[async_trait]
impl ReportingSink for CheckRunSink {
    fn name(&self) -> &'static str {
        "check-run"
    }

    async fn post(&self, report: &Report) -> Result<()> {
        let url = format!("{}/repos/{}/check-runs", self.api_base, self.repo);
        debug!(%url, check_name = %report.check_name, failed = report.failed, "posting check run");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .json(&Self::payload(report))
            .send()
            .await
            .context("check-run request failed")?;

        response
            .error_for_status()
            .context("check-run creation rejected")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(failed: bool) -> Report {
        Report {
            check_name: "Dependency Review - Vulnerabilities".to_string(),
            sha: "deadbeef".to_string(),
            body: "## Vulnerabilities\n".to_string(),
            tables: Vec::new(),
            failed,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_conclusion_follows_failed_flag() {
        let passing_report = report(false);
        let passing = CheckRunSink::payload(&passing_report);
        assert_eq!(passing.conclusion, "success");
        assert_eq!(passing.status, "completed");

        let failing_report = report(true);
        let failing = CheckRunSink::payload(&failing_report);
        assert_eq!(failing.conclusion, "failure");
    }

    #[test]
    fn test_payload_serialization() {
        let json = serde_json::to_value(CheckRunSink::payload(&report(true))).unwrap();
        assert_eq!(json["head_sha"], "deadbeef");
        assert_eq!(json["conclusion"], "failure");
        assert_eq!(json["output"]["summary"], "## Vulnerabilities\n");
    }
}
