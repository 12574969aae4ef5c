//! Core data types for dependency changes and their advisories.
//!
//! This module contains the fundamental types used throughout depreview:
//!
//! - [`Change`] - One dependency difference between two manifest states
//! - [`ChangeType`] - Whether the dependency was added or removed
//! - [`Severity`] - Advisory severity with an explicit ordinal ranking
//! - [`Vulnerability`] - A security advisory attached to a change
//!
//! # Example
//!
//! ```
//! use depreview::{Change, ChangeType, Severity, Vulnerability};
//!
//! let change = Change::new(ChangeType::Added, "package-lock.json", "npm", "lodash", "4.17.20")
//!     .with_license("MIT")
//!     .with_vulnerabilities(vec![Vulnerability::new(
//!         Severity::High,
//!         "GHSA-p6mc-m468-83gw",
//!         "Prototype pollution in lodash",
//!     )]);
//!
//! assert_eq!(change.vulnerabilities.len(), 1);
//! ```

mod change;
mod severity;
mod vulnerability;

pub use change::*;
pub use severity::*;
pub use vulnerability::*;
