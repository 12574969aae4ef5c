//! CI event context.
//!
//! Resolves the repository and the commit range under review from the
//! workflow environment. Runs triggered by anything other than a pull
//! request are rejected here, before any network traffic.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(
        "dependency review only supports pull_request workflows (triggered by `{0}`); \
         change the workflow trigger to pull_request or pull_request_target"
    )]
    UnsupportedTrigger(String),

    #[error("missing environment variable `{0}`; this does not look like a CI workflow run")]
    MissingEnv(&'static str),

    #[error("malformed repository slug `{0}`; expected `owner/repo`")]
    MalformedRepository(String),

    #[error("failed to read event payload: {0}")]
    PayloadRead(#[from] std::io::Error),

    #[error("failed to parse event payload: {0}")]
    PayloadParse(#[from] serde_json::Error),
}

/// Everything the run needs to know about where it was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub event_name: String,
    pub owner: String,
    pub repo: String,
    /// Base commit of the pull request.
    pub base_sha: String,
    /// Head commit of the pull request; check results attach to it.
    pub head_sha: String,
}

#[derive(Deserialize)]
struct PullRequestEvent {
    pull_request: PullRequestPayload,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    base: CommitRef,
    head: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

impl RunContext {
    /// Builds the context from the workflow environment
    /// (`GITHUB_EVENT_NAME`, `GITHUB_REPOSITORY`, `GITHUB_EVENT_PATH`).
    pub fn from_env() -> Result<Self, ContextError> {
        let event_name = require_env("GITHUB_EVENT_NAME")?;
        let repository = require_env("GITHUB_REPOSITORY")?;
        let event_path = require_env("GITHUB_EVENT_PATH")?;
        let payload = std::fs::read_to_string(Path::new(&event_path))?;
        Self::from_parts(&event_name, &repository, &payload)
    }

    /// Builds the context from already-extracted pieces.
    pub fn from_parts(
        event_name: &str,
        repository: &str,
        payload: &str,
    ) -> Result<Self, ContextError> {
        if !matches!(event_name, "pull_request" | "pull_request_target") {
            return Err(ContextError::UnsupportedTrigger(event_name.to_string()));
        }

        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty())
            .ok_or_else(|| ContextError::MalformedRepository(repository.to_string()))?;

        let event: PullRequestEvent = serde_json::from_str(payload)?;

        Ok(Self {
            event_name: event_name.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            base_sha: event.pull_request.base.sha,
            head_sha: event.pull_request.head.sha,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ContextError> {
    std::env::var(name).map_err(|_| ContextError::MissingEnv(name))
}
