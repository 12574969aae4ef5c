//! Markdown rendering of the vulnerability and license reports.
//!
//! The documents produced here become check-run bodies and step-summary
//! content, so they stick to widely supported Markdown: headings, quote
//! blocks naming the manifest, and pipe tables.

use chrono::{DateTime, Utc};

use crate::model::{Change, Severity};
use crate::output::{group_by_manifest, severity_color, SeverityColor};
use crate::policy::{LicensePolicy, LicenseReport};

/// Renders the vulnerability report body.
///
/// `vulnerable` is the vulnerable-added selection; `total_changes` is the
/// size of the raw diff, used to note an empty comparison.
pub fn render_vulnerability_report(
    vulnerable: &[Change],
    total_changes: usize,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str("## Vulnerabilities\n\n");

    if total_changes == 0 {
        out.push_str("> The comparison contained no dependency manifest changes.\n\n");
    }

    if vulnerable.is_empty() {
        out.push_str(
            "No vulnerable dependencies were added at or above the configured severity threshold.\n",
        );
    } else {
        out.push_str(&format!(
            "{} added {} security advisories at or above the configured severity threshold.\n\n",
            vulnerable.len(),
            if vulnerable.len() == 1 {
                "dependency carries"
            } else {
                "dependencies carry"
            }
        ));

        for (manifest, members) in group_by_manifest(vulnerable) {
            out.push_str(&format!("> `{}`\n\n", manifest));
            out.push_str("| Package | Version | Vulnerability | Severity |\n");
            out.push_str("| --- | --- | --- | --- |\n");

            let mut previous: Option<(&str, &str)> = None;
            for change in members {
                for vuln in &change.vulnerabilities {
                    let repeated =
                        previous == Some((change.name.as_str(), change.version.as_str()));
                    let (name, version) = if repeated {
                        ("", "")
                    } else {
                        (change.name.as_str(), change.version.as_str())
                    };
                    out.push_str(&format!(
                        "| {} | {} | [{}]({}) | {} |\n",
                        name,
                        version,
                        escape_cell(&vuln.advisory_summary),
                        vuln.advisory_url,
                        severity_markdown(vuln.severity),
                    ));
                    previous = Some((change.name.as_str(), change.version.as_str()));
                }
            }
            out.push('\n');
        }
    }

    out.push_str(&footer(generated_at));
    out
}

/// Renders the license report body, including the policy banner lines.
pub fn render_license_report(
    report: &LicenseReport,
    policy: &LicensePolicy,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str("## License Issues\n\n");

    if !policy.deny.is_empty() {
        out.push_str(&format!(
            "> Denied licenses: {}\n\n",
            license_list(&policy.deny)
        ));
    }
    if !policy.allow.is_empty() {
        out.push_str(&format!(
            "> Allowed licenses: {}\n\n",
            license_list(&policy.allow)
        ));
    }

    if report.is_empty() {
        out.push_str("No license violations were detected among the added dependencies.\n");
    } else {
        if !report.denied.is_empty() {
            out.push_str("### Incompatible Licenses\n\n");
            for (manifest, members) in group_by_manifest(&report.denied) {
                out.push_str(&format!("> `{}`\n\n", manifest));
                out.push_str("| Package | Version | License |\n");
                out.push_str("| --- | --- | --- |\n");
                for change in members {
                    out.push_str(&format!(
                        "| {} | {} | {} |\n",
                        change.name,
                        change.version,
                        change.license.as_deref().unwrap_or("-"),
                    ));
                }
                out.push('\n');
            }
        }

        if !report.unknown.is_empty() {
            out.push_str("### Unknown Licenses\n\n");
            for (manifest, members) in group_by_manifest(&report.unknown) {
                out.push_str(&format!("> `{}`\n\n", manifest));
                out.push_str("| Package | Version |\n");
                out.push_str("| --- | --- |\n");
                for change in members {
                    out.push_str(&format!("| {} | {} |\n", change.name, change.version));
                }
                out.push('\n');
            }
        }
    }

    out.push_str(&footer(generated_at));
    out
}

/// Emphasis follows the fixed color mapping: red is bold, yellow italic,
/// neutral plain.
fn severity_markdown(severity: Severity) -> String {
    let label = severity.display_name();
    match severity_color(severity) {
        SeverityColor::Red => format!("**{}**", label),
        SeverityColor::Yellow => format!("_{}_", label),
        SeverityColor::Neutral => label.to_string(),
    }
}

fn license_list(licenses: &[String]) -> String {
    licenses
        .iter()
        .map(|l| format!("`{}`", l))
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

fn footer(generated_at: DateTime<Utc>) -> String {
    format!(
        "_Generated at {}_\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChangeType, Vulnerability};

    fn stamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn vulnerable_change(manifest: &str, name: &str, version: &str, count: usize) -> Change {
        let vulns = (0..count)
            .map(|i| {
                Vulnerability::new(
                    Severity::High,
                    format!("GHSA-{}-{}", name, i),
                    format!("advisory {} for {}", i, name),
                )
            })
            .collect();
        Change::new(ChangeType::Added, manifest, "npm", name, version)
            .with_vulnerabilities(vulns)
    }

    #[test]
    fn test_empty_vulnerability_report() {
        let body = render_vulnerability_report(&[], 3, stamp());
        assert!(body.contains("No vulnerable dependencies were added"));
        assert!(!body.contains("no dependency manifest changes"));
    }

    #[test]
    fn test_empty_diff_note() {
        let body = render_vulnerability_report(&[], 0, stamp());
        assert!(body.contains("no dependency manifest changes"));
    }

    #[test]
    fn test_repeated_package_version_rows_are_compressed() {
        // Two changes with the same (name, version), two advisories each:
        // only the first of the four rows spells out the package identity.
        let changes = vec![
            vulnerable_change("package-lock.json", "lodash", "4.17.20", 2),
            vulnerable_change("package-lock.json", "lodash", "4.17.20", 2),
        ];
        let body = render_vulnerability_report(&changes, 2, stamp());

        let package_rows: Vec<&str> = body
            .lines()
            .filter(|l| l.starts_with("| ") && !l.starts_with("| Package") && !l.starts_with("| ---"))
            .collect();
        assert_eq!(package_rows.len(), 4);
        assert!(package_rows[0].starts_with("| lodash | 4.17.20 |"));
        for row in &package_rows[1..] {
            assert!(row.starts_with("|  |  |"), "row not compressed: {}", row);
        }
    }

    #[test]
    fn test_distinct_versions_are_not_compressed() {
        let changes = vec![
            vulnerable_change("package-lock.json", "lodash", "4.17.20", 1),
            vulnerable_change("package-lock.json", "lodash", "4.17.21", 1),
        ];
        let body = render_vulnerability_report(&changes, 2, stamp());
        assert!(body.contains("| lodash | 4.17.20 |"));
        assert!(body.contains("| lodash | 4.17.21 |"));
    }

    #[test]
    fn test_manifest_quote_blocks_in_insertion_order() {
        let changes = vec![
            vulnerable_change("b/package-lock.json", "one", "1.0.0", 1),
            vulnerable_change("a/Cargo.lock", "two", "1.0.0", 1),
        ];
        let body = render_vulnerability_report(&changes, 2, stamp());
        let first = body.find("> `b/package-lock.json`").unwrap();
        let second = body.find("> `a/Cargo.lock`").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_severity_emphasis_mapping() {
        assert_eq!(severity_markdown(Severity::Critical), "**Critical**");
        assert_eq!(severity_markdown(Severity::High), "**High**");
        assert_eq!(severity_markdown(Severity::Moderate), "_Moderate_");
        assert_eq!(severity_markdown(Severity::Low), "Low");
    }

    #[test]
    fn test_license_banner_only_for_configured_lists() {
        let report = LicenseReport::default();

        let deny = LicensePolicy::deny(vec!["GPL-3.0".to_string()]);
        let body = render_license_report(&report, &deny, stamp());
        assert!(body.contains("> Denied licenses: `GPL-3.0`"));
        assert!(!body.contains("> Allowed licenses:"));

        let allow = LicensePolicy::allow(vec!["MIT".to_string(), "Apache-2.0".to_string()]);
        let body = render_license_report(&report, &allow, stamp());
        assert!(body.contains("> Allowed licenses: `MIT`, `Apache-2.0`"));
        assert!(!body.contains("> Denied licenses:"));
    }

    #[test]
    fn test_license_report_sections() {
        let denied = Change::new(ChangeType::Added, "Cargo.lock", "cargo", "gpl-lib", "1.0.0")
            .with_license("GPL-3.0");
        let unknown = Change::new(ChangeType::Added, "Cargo.lock", "cargo", "mystery", "2.0.0");
        let report = LicenseReport {
            denied: vec![denied],
            unknown: vec![unknown],
        };
        let policy = LicensePolicy::deny(vec!["GPL-3.0".to_string()]);
        let body = render_license_report(&report, &policy, stamp());

        assert!(body.contains("### Incompatible Licenses"));
        assert!(body.contains("| gpl-lib | 1.0.0 | GPL-3.0 |"));
        assert!(body.contains("### Unknown Licenses"));
        assert!(body.contains("| mystery | 2.0.0 |"));
    }

    #[test]
    fn test_pipe_in_advisory_summary_is_escaped() {
        let change = Change::new(ChangeType::Added, "Cargo.lock", "cargo", "lib", "1.0.0")
            .with_vulnerabilities(vec![Vulnerability::new(
                Severity::Low,
                "GHSA-aaaa-bbbb-cccc",
                "bad | pipe",
            )]);
        let body = render_vulnerability_report(&[change], 1, stamp());
        assert!(body.contains("bad \\| pipe"));
    }
}
