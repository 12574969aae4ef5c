use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::model::{Change, ChangeType, DependencyScope, Severity, Vulnerability};

use super::{ComparisonProvider, ProviderError};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("depreview/", env!("CARGO_PKG_VERSION"));

/// Comparison provider backed by the GitHub dependency graph compare
/// endpoint.
pub struct GithubProvider {
    client: reqwest::Client,
    token: String,
    api_base: String,
}

impl GithubProvider {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Points the provider at a different API root (GitHub Enterprise, test
    /// servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

// Wire format of the compare endpoint. Kept private; the rest of the crate
// only sees the model types.
#[derive(Deserialize)]
struct WireChange {
    change_type: WireChangeType,
    manifest: String,
    ecosystem: String,
    name: String,
    version: String,
    package_url: String,
    license: Option<String>,
    source_repository_url: Option<String>,
    #[serde(default)]
    scope: Option<WireScope>,
    #[serde(default)]
    vulnerabilities: Vec<WireVulnerability>,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireChangeType {
    Added,
    Removed,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireScope {
    Runtime,
    Development,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
struct WireVulnerability {
    severity: Severity,
    advisory_ghsa_id: String,
    advisory_summary: String,
    advisory_url: String,
}

impl From<WireChange> for Change {
    fn from(wire: WireChange) -> Self {
        Change {
            change_type: match wire.change_type {
                WireChangeType::Added => ChangeType::Added,
                WireChangeType::Removed => ChangeType::Removed,
            },
            manifest: wire.manifest,
            ecosystem: wire.ecosystem,
            name: wire.name,
            version: wire.version,
            package_url: wire.package_url,
            license: wire.license,
            source_repository_url: wire.source_repository_url,
            scope: match wire.scope {
                Some(WireScope::Runtime) => Some(DependencyScope::Runtime),
                Some(WireScope::Development) => Some(DependencyScope::Development),
                _ => None,
            },
            vulnerabilities: wire
                .vulnerabilities
                .into_iter()
                .map(|v| Vulnerability {
                    severity: v.severity,
                    advisory_ghsa_id: v.advisory_ghsa_id,
                    advisory_summary: v.advisory_summary,
                    advisory_url: v.advisory_url,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl ComparisonProvider for GithubProvider {
    fn name(&self) -> &'static str {
        "GitHub dependency graph"
    }

    async fn compare(
        &self,
        owner: &str,
        repo: &str,
        base_ref: &str,
        head_ref: &str,
    ) -> Result<Vec<Change>, ProviderError> {
        let url = format!(
            "{}/repos/{}/{}/dependency-graph/compare/{}...{}",
            self.api_base, owner, repo, base_ref, head_ref
        );
        debug!(%url, "fetching dependency comparison");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        match response.status().as_u16() {
            200 => {}
            404 => {
                return Err(ProviderError::NotFound {
                    base: base_ref.to_string(),
                    head: head_ref.to_string(),
                })
            }
            403 => {
                return Err(ProviderError::Forbidden {
                    repo: format!("{}/{}", owner, repo),
                })
            }
            status => return Err(ProviderError::UnexpectedStatus { status }),
        }

        let wire: Vec<WireChange> = response.json().await?;
        debug!(count = wire.len(), "dependency comparison fetched");
        Ok(wire.into_iter().map(Change::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "change_type": "added",
            "manifest": "package-lock.json",
            "ecosystem": "npm",
            "name": "minimist",
            "version": "0.0.8",
            "package_url": "pkg:npm/minimist@0.0.8",
            "license": "MIT",
            "source_repository_url": "https://github.com/substack/minimist",
            "scope": "runtime",
            "vulnerabilities": [
                {
                    "severity": "critical",
                    "advisory_ghsa_id": "GHSA-xvch-5gv4-984h",
                    "advisory_summary": "Prototype Pollution in minimist",
                    "advisory_url": "https://github.com/advisories/GHSA-xvch-5gv4-984h"
                }
            ]
        },
        {
            "change_type": "removed",
            "manifest": "package-lock.json",
            "ecosystem": "npm",
            "name": "left-pad",
            "version": "1.3.0",
            "package_url": "pkg:npm/left-pad@1.3.0",
            "license": null,
            "source_repository_url": null,
            "vulnerabilities": []
        }
    ]"#;

    #[test]
    fn test_wire_change_deserialization() {
        let wire: Vec<WireChange> = serde_json::from_str(SAMPLE).unwrap();
        let changes: Vec<Change> = wire.into_iter().map(Change::from).collect();

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].change_type, ChangeType::Added);
        assert_eq!(changes[0].name, "minimist");
        assert_eq!(changes[0].license.as_deref(), Some("MIT"));
        assert_eq!(changes[0].scope, Some(DependencyScope::Runtime));
        assert_eq!(changes[0].vulnerabilities.len(), 1);
        assert_eq!(changes[0].vulnerabilities[0].severity, Severity::Critical);
        assert_eq!(
            changes[0].vulnerabilities[0].advisory_ghsa_id,
            "GHSA-xvch-5gv4-984h"
        );

        assert_eq!(changes[1].change_type, ChangeType::Removed);
        assert_eq!(changes[1].license, None);
        assert_eq!(changes[1].scope, None);
        assert!(changes[1].vulnerabilities.is_empty());
    }

    #[test]
    fn test_error_messages_are_user_actionable() {
        let not_found = ProviderError::NotFound {
            base: "abc123".to_string(),
            head: "def456".to_string(),
        };
        assert!(not_found.to_string().contains("abc123...def456"));

        let forbidden = ProviderError::Forbidden {
            repo: "octo/widgets".to_string(),
        };
        assert!(forbidden.to_string().contains("octo/widgets"));
        assert!(forbidden.to_string().contains("enable it"));
    }
}
