//! The shared sideload / accessibility heuristic.
//!
//! Both evaluators classify installers against the same [`Allowlist`] and
//! score verdicts with the same confidence model.

pub mod accessibility;
pub mod allowlist;
pub mod confidence;
pub mod installer;
pub mod result;

#[cfg(test)]
pub(crate) mod testing;

pub use accessibility::{AccessibilityMatch, AccessibilityState};
pub use allowlist::Allowlist;
pub use confidence::Assessment;
pub use result::{AppDetectionResult, DetectionResult, DeviceDetectionResult};

/// Installer classification shared by both evaluators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallerVerdict {
    pub installer_unknown: bool,
    pub sideloaded: bool,
}

/// Classify a resolved installer against the allowlist.
///
/// `sideloaded` requires a known installer outside the allowlist, so the
/// two flags are never both set.
pub fn classify_installer(installer: Option<&str>, allowlist: &Allowlist) -> InstallerVerdict {
    InstallerVerdict {
        installer_unknown: installer.is_none(),
        sideloaded: installer.is_some_and(|i| !allowlist.contains(i)),
    }
}
