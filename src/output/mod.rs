//! Report rendering.
//!
//! Two renderings are produced from the same grouped data:
//!
//! - [`markdown`] - a Markdown document for check-run bodies and the step
//!   summary
//! - [`summary`] - a structured table model consumed by the console and
//!   check-run sinks
//!
//! Both follow the same grouping rules: changes are grouped by manifest in
//! first-occurrence order, and vulnerability rows belonging to the same
//! `(name, version)` pair leave the package and version cells empty after the
//! first row. Rendering is pure; no I/O happens here.

mod markdown;
mod summary;

pub use markdown::{render_license_report, render_vulnerability_report};
pub use summary::{license_tables, vulnerability_tables, SummaryTable};

use crate::model::{Change, Severity};

/// Display color for a severity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityColor {
    Red,
    Yellow,
    Neutral,
}

/// Fixed severity-to-color mapping used by every rendering surface.
pub fn severity_color(severity: Severity) -> SeverityColor {
    match severity {
        Severity::Critical => SeverityColor::Red,
        Severity::High => SeverityColor::Red,
        Severity::Moderate => SeverityColor::Yellow,
        Severity::Low => SeverityColor::Neutral,
    }
}

/// Groups changes by manifest, preserving the first-occurrence order of each
/// manifest name and the input order of the members within a group.
pub fn group_by_manifest(changes: &[Change]) -> Vec<(&str, Vec<&Change>)> {
    let mut groups: Vec<(&str, Vec<&Change>)> = Vec::new();
    for change in changes {
        match groups.iter_mut().find(|(m, _)| *m == change.manifest) {
            Some((_, members)) => members.push(change),
            None => groups.push((change.manifest.as_str(), vec![change])),
        }
    }
    groups
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
