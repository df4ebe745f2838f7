pub mod snapshot;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use snapshot::SnapshotPlatform;

/// Raw device facts the heuristic depends on.
///
/// Implementations wrap whatever the host exposes (package manager bindings,
/// a captured device snapshot, a test double). They report raw strings and
/// integers only; all interpretation happens in [`crate::heuristic`].
pub trait Platform: Send + Sync {
    /// Package identity of the application running the evaluation.
    fn own_package(&self) -> Result<String>;

    /// Richer install-source query (Android 11+ `InstallSourceInfo`).
    ///
    /// Never fails: every way the query can fall short is an
    /// [`InstallerQuery::Unavailable`] variant.
    fn install_source(&self, package: &str) -> InstallerQuery;

    /// Legacy installer-package query, available on every platform version.
    fn legacy_installer(&self, package: &str) -> Result<Option<String>>;

    /// All applications installed on the device, in platform order.
    fn installed_apps(&self) -> Result<Vec<InstalledApp>>;

    /// Global `accessibility_enabled` secure setting (0 means off).
    fn accessibility_enabled(&self) -> Result<i64>;

    /// `enabled_accessibility_services` secure setting, colon-separated
    /// `package/component` entries. `None` when the setting is unset.
    fn enabled_accessibility_services(&self) -> Result<Option<String>>;
}

/// Outcome of the richer install-source query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallerQuery {
    /// The query named a non-blank installing package.
    Resolved(String),
    /// The legacy query must be consulted instead.
    Unavailable(UnavailableReason),
}

/// Why the richer install-source query produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Platform version predates the query.
    Unsupported,
    /// Query ran but the installer was hidden, restricted or blank.
    NotReported,
    /// Query raised an error.
    Failed(String),
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "unsupported"),
            Self::NotReported => write!(f, "not reported"),
            Self::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

/// An installed application as reported by platform enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    pub package_name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub system_app: bool,
}
