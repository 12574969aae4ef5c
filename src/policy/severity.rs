use crate::model::{Change, ChangeType, Severity};

/// Narrows a change list to the changes whose vulnerabilities meet the
/// minimum severity.
///
/// With no threshold configured the input is returned unmodified. A retained
/// change keeps only its qualifying vulnerabilities; a change whose
/// vulnerabilities all fall below the threshold is dropped. Changes with no
/// vulnerabilities at all pass through untouched.
pub fn filter_by_severity(min_severity: Option<Severity>, changes: Vec<Change>) -> Vec<Change> {
    let Some(min) = min_severity else {
        return changes;
    };

    changes
        .into_iter()
        .filter_map(|mut change| {
            if change.vulnerabilities.is_empty() {
                return Some(change);
            }
            change.vulnerabilities.retain(|v| v.severity >= min);
            if change.vulnerabilities.is_empty() {
                None
            } else {
                Some(change)
            }
        })
        .collect()
}

/// Selects the newly added dependencies that carry at least one
/// vulnerability, preserving input order.
///
/// Intended to run on the output of [`filter_by_severity`], so the
/// vulnerabilities on each selected change are already at or above the
/// configured threshold.
pub fn vulnerable_added(changes: &[Change]) -> Vec<Change> {
    changes
        .iter()
        .filter(|c| c.change_type == ChangeType::Added && !c.vulnerabilities.is_empty())
        .cloned()
        .collect()
}
