use serde::Serialize;

use crate::model::{Change, ChangeType};

/// License allow/deny policy.
///
/// The two lists carry mutually exclusive intents: with `allow` configured
/// only listed licenses pass, with `deny` configured listed licenses fail.
/// Configuration rejects setting both, but if both ever reach the classifier
/// deny-membership is authoritative and is checked first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicensePolicy {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl LicensePolicy {
    pub fn allow(licenses: Vec<String>) -> Self {
        Self {
            allow: licenses,
            deny: Vec::new(),
        }
    }

    pub fn deny(licenses: Vec<String>) -> Self {
        Self {
            allow: Vec::new(),
            deny: licenses,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.allow.is_empty() || !self.deny.is_empty()
    }
}

/// Partition of added changes into license policy outcomes.
///
/// `denied` and `unknown` are disjoint and both preserve the relative order
/// of the input. Compliant changes appear in neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LicenseReport {
    pub denied: Vec<Change>,
    pub unknown: Vec<Change>,
}

impl LicenseReport {
    pub fn is_empty(&self) -> bool {
        self.denied.is_empty() && self.unknown.is_empty()
    }
}

/// Classifies added changes against the license policy.
///
/// Removed dependencies never violate license policy and are skipped. A
/// change with no license information is always `unknown`, never `denied`.
/// With no policy configured at all the partition is empty.
pub fn classify(changes: &[Change], policy: &LicensePolicy) -> LicenseReport {
    let mut report = LicenseReport::default();
    if !policy.is_configured() {
        return report;
    }

    for change in changes {
        if change.change_type != ChangeType::Added {
            continue;
        }
        match &change.license {
            None => report.unknown.push(change.clone()),
            Some(license) => {
                if !policy.deny.is_empty() && policy.deny.iter().any(|l| l == license) {
                    report.denied.push(change.clone());
                } else if !policy.allow.is_empty() && !policy.allow.iter().any(|l| l == license) {
                    report.denied.push(change.clone());
                }
            }
        }
    }

    report
}
