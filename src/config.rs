//! Policy configuration.
//!
//! The policy file lives in the checked-out workspace and is addressed with
//! `--config`; CLI flags override its values. The rest of the crate only ever
//! sees the validated, immutable [`Config`].
//!
//! # Example Configuration
//!
//! ```toml
//! fail_on_severity = "high"
//! deny_licenses = ["GPL-3.0", "AGPL-3.0"]
//! check_name_vulnerability = "Dependency Review - Vulnerabilities"
//! check_name_license = "Dependency Review - Licenses"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::Severity;
use crate::policy::LicensePolicy;

/// Run configuration.
///
/// `allow_licenses` and `deny_licenses` carry mutually exclusive intents;
/// [`Config::validate`] rejects setting both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum severity that counts as a policy violation.
    ///
    /// Absent means no severity filtering: every vulnerability passes the
    /// filter.
    pub fail_on_severity: Option<Severity>,

    /// Only these licenses pass, when set.
    pub allow_licenses: Option<Vec<String>>,

    /// These licenses fail, when set.
    pub deny_licenses: Option<Vec<String>>,

    /// Check-run title for the vulnerability report.
    pub check_name_vulnerability: String,

    /// Check-run title for the license report.
    pub check_name_license: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fail_on_severity: None,
            allow_licenses: None,
            deny_licenses: None,
            check_name_vulnerability: "Dependency Review - Vulnerabilities".to_string(),
            check_name_license: "Dependency Review - Licenses".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the given TOML file.
    ///
    /// A missing file yields the default configuration; an unreadable or
    /// unparsable file is an error. Unknown severity strings fail here, at
    /// the edge, so the core never sees them.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Rejects contradictory policy before the run starts.
    pub fn validate(&self) -> Result<()> {
        let allow_set = self.allow_licenses.as_ref().is_some_and(|l| !l.is_empty());
        let deny_set = self.deny_licenses.as_ref().is_some_and(|l| !l.is_empty());
        if allow_set && deny_set {
            bail!(
                "allow_licenses and deny_licenses are mutually exclusive; \
                 configure at most one of them"
            );
        }
        Ok(())
    }

    pub fn license_policy(&self) -> LicensePolicy {
        LicensePolicy {
            allow: self.allow_licenses.clone().unwrap_or_default(),
            deny: self.deny_licenses.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/depreview.toml")).unwrap();
        assert_eq!(config.fail_on_severity, None);
        assert_eq!(
            config.check_name_vulnerability,
            "Dependency Review - Vulnerabilities"
        );
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            fail_on_severity = "high"
            deny_licenses = ["GPL-3.0"]
            check_name_license = "Licenses"
            "#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.fail_on_severity, Some(Severity::High));
        assert_eq!(config.deny_licenses, Some(vec!["GPL-3.0".to_string()]));
        assert_eq!(config.check_name_license, "Licenses");
        // Untouched fields keep their defaults.
        assert_eq!(
            config.check_name_vulnerability,
            "Dependency Review - Vulnerabilities"
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_severity_string_is_rejected() {
        let file = write_config(r#"fail_on_severity = "medium""#);
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_allow_and_deny_together_fail_validation() {
        let config = Config {
            allow_licenses: Some(vec!["MIT".to_string()]),
            deny_licenses: Some(vec!["GPL-3.0".to_string()]),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_lists_do_not_conflict() {
        let config = Config {
            allow_licenses: Some(vec!["MIT".to_string()]),
            deny_licenses: Some(Vec::new()),
            ..Config::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_license_policy_from_config() {
        let config = Config {
            deny_licenses: Some(vec!["GPL-3.0".to_string()]),
            ..Config::default()
        };
        let policy = config.license_policy();
        assert_eq!(policy.deny, vec!["GPL-3.0".to_string()]);
        assert!(policy.allow.is_empty());
        assert!(policy.is_configured());
    }
}
