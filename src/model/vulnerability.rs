use serde::{Deserialize, Serialize};

use crate::model::Severity;

/// A security advisory attached to a dependency change.
///
/// Belongs to exactly one [`Change`](crate::model::Change); it has no
/// lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub severity: Severity,
    pub advisory_ghsa_id: String,
    pub advisory_summary: String,
    pub advisory_url: String,
}

impl Vulnerability {
    pub fn new(
        severity: Severity,
        ghsa_id: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        let ghsa_id = ghsa_id.into();
        let advisory_url = format!("https://github.com/advisories/{}", ghsa_id);
        Self {
            severity,
            advisory_ghsa_id: ghsa_id,
            advisory_summary: summary.into(),
            advisory_url,
        }
    }
}
