//! Policy evaluation pipeline.
//!
//! Pure transformations from the raw change list supplied by the comparison
//! provider to the two result sets the run reports on:
//!
//! - [`filter_by_severity`] + [`vulnerable_added`] - newly added dependencies
//!   with vulnerabilities at or above the configured threshold
//! - [`classify`] - added dependencies whose license is denied or unknown
//!   under the allow/deny policy
//!
//! Everything here is synchronous, allocation-only code with no I/O.

mod license;
mod severity;

pub use license::{classify, LicensePolicy, LicenseReport};
pub use severity::{filter_by_severity, vulnerable_added};

use serde::Serialize;

use crate::model::{Change, Severity};

/// Outcome of one policy evaluation over a comparison's change list.
///
/// Policy violations are classification results, not errors: they flip the
/// per-report failed flags and ultimately the exit status, but both reports
/// are always produced.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// Added dependencies with at least one vulnerability at or above the
    /// threshold, in provider order.
    pub vulnerable_changes: Vec<Change>,
    /// License partition of the added dependencies.
    pub license_report: LicenseReport,
}

impl Evaluation {
    /// Runs the full pipeline: severity filter, vulnerable-added selection,
    /// and license classification (the latter on the unfiltered list).
    pub fn run(
        changes: &[Change],
        fail_on_severity: Option<Severity>,
        license_policy: &LicensePolicy,
    ) -> Self {
        let filtered = filter_by_severity(fail_on_severity, changes.to_vec());
        let vulnerable_changes = vulnerable_added(&filtered);
        let license_report = classify(changes, license_policy);
        Self {
            vulnerable_changes,
            license_report,
        }
    }

    pub fn vulnerabilities_failed(&self) -> bool {
        !self.vulnerable_changes.is_empty()
    }

    /// Denied licenses fail the run; unknown licenses alone only warn.
    pub fn licenses_failed(&self) -> bool {
        !self.license_report.denied.is_empty()
    }

    pub fn failed(&self) -> bool {
        self.vulnerabilities_failed() || self.licenses_failed()
    }
}
