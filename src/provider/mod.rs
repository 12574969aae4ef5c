//! Dependency comparison providers.
//!
//! A provider answers one question: which dependencies differ between two
//! refs of a repository. The core never retries provider calls; the two
//! well-known failure modes carry their own user-actionable messages.

mod github;

pub use github::GithubProvider;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Change;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The comparison endpoint has no data for the requested ref range.
    #[error(
        "no dependency diff found for `{base}...{head}`; the dependency graph \
         may not have processed these commits yet, or the refs are outside the \
         repository history"
    )]
    NotFound { base: String, head: String },

    /// The dependency graph feature is disabled on the repository.
    #[error(
        "dependency graph is not enabled for `{repo}`; enable it under \
         Settings > Code security and analysis, then re-run the check"
    )]
    Forbidden { repo: String },

    /// The endpoint answered with a status the provider does not understand.
    #[error("dependency comparison failed with unexpected status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("dependency comparison request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Produces the dependency diff between two refs.
#[async_trait]
pub trait ComparisonProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn compare(
        &self,
        owner: &str,
        repo: &str,
        base_ref: &str,
        head_ref: &str,
    ) -> Result<Vec<Change>, ProviderError>;
}

/// Returns the default provider backed by the GitHub dependency graph.
pub fn default_provider(token: String) -> GithubProvider {
    GithubProvider::new(token)
}
