//! Structured table model for check-run and console surfaces.
//!
//! Mirrors the Markdown rendering exactly: one table per manifest in
//! first-occurrence order, vulnerability rows compressed for repeated
//! `(name, version)` pairs.

use crate::model::Change;
use crate::output::{group_by_manifest, truncate};
use crate::policy::LicenseReport;

/// Maximum advisory summary width in tabular surfaces.
const SUMMARY_CELL_WIDTH: usize = 80;

/// One rendered table: a title, a header row, and data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Builds one vulnerability table per manifest from the vulnerable-added
/// selection.
pub fn vulnerability_tables(vulnerable: &[Change]) -> Vec<SummaryTable> {
    group_by_manifest(vulnerable)
        .into_iter()
        .map(|(manifest, members)| {
            let mut rows = Vec::new();
            let mut previous: Option<(&str, &str)> = None;
            for change in members {
                for vuln in &change.vulnerabilities {
                    let repeated =
                        previous == Some((change.name.as_str(), change.version.as_str()));
                    let (name, version) = if repeated {
                        (String::new(), String::new())
                    } else {
                        (change.name.clone(), change.version.clone())
                    };
                    rows.push(vec![
                        name,
                        version,
                        truncate(&vuln.advisory_summary, SUMMARY_CELL_WIDTH),
                        vuln.severity.display_name().to_string(),
                    ]);
                    previous = Some((change.name.as_str(), change.version.as_str()));
                }
            }
            SummaryTable {
                title: manifest.to_string(),
                header: vec![
                    "Package".to_string(),
                    "Version".to_string(),
                    "Vulnerability".to_string(),
                    "Severity".to_string(),
                ],
                rows,
            }
        })
        .collect()
}

/// Builds the denied and unknown license tables, one per manifest each.
pub fn license_tables(report: &LicenseReport) -> Vec<SummaryTable> {
    let mut tables = Vec::new();

    for (manifest, members) in group_by_manifest(&report.denied) {
        tables.push(SummaryTable {
            title: format!("Incompatible licenses in {}", manifest),
            header: vec![
                "Package".to_string(),
                "Version".to_string(),
                "License".to_string(),
            ],
            rows: members
                .iter()
                .map(|c| {
                    vec![
                        c.name.clone(),
                        c.version.clone(),
                        c.license.clone().unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect(),
        });
    }

    for (manifest, members) in group_by_manifest(&report.unknown) {
        tables.push(SummaryTable {
            title: format!("Unknown licenses in {}", manifest),
            header: vec!["Package".to_string(), "Version".to_string()],
            rows: members
                .iter()
                .map(|c| vec![c.name.clone(), c.version.clone()])
                .collect(),
        });
    }

    tables
}
