use serde::{Deserialize, Serialize};

use crate::model::Vulnerability;

/// Direction of a dependency change between two manifest states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a dependency is pulled in at runtime or only for development.
///
/// Informational only; policy evaluation never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Runtime,
    Development,
}

/// One dependency difference between the base and head of a comparison.
///
/// Produced by the comparison provider and treated as an immutable snapshot
/// for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub change_type: ChangeType,
    pub manifest: String,
    pub ecosystem: String,
    pub name: String,
    pub version: String,
    pub package_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<DependencyScope>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

impl Change {
    pub fn new(
        change_type: ChangeType,
        manifest: impl Into<String>,
        ecosystem: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let ecosystem = ecosystem.into();
        let name = name.into();
        let version = version.into();
        let package_url = format!("pkg:{}/{}@{}", ecosystem, name, version);
        Self {
            change_type,
            manifest: manifest.into(),
            ecosystem,
            name,
            version,
            package_url,
            license: None,
            source_repository_url: None,
            scope: None,
            vulnerabilities: Vec::new(),
        }
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_vulnerabilities(mut self, vulnerabilities: Vec<Vulnerability>) -> Self {
        self.vulnerabilities = vulnerabilities;
        self
    }
}
