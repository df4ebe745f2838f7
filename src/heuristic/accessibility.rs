use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Interpreted accessibility settings of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessibilityState {
    /// Flag is off, or the settings store could not be read.
    Disabled,
    /// Flag is on but the enabled-services list is unset.
    Unparsable,
    /// Flag is on; raw `package/component` entries.
    Services(Vec<String>),
}

/// How fleet mode attributes an enabled service to an app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessibilityMatch {
    /// Full entry starts with the package name. `com.foo` also matches
    /// `com.foobar/.Svc`.
    #[default]
    Prefix,
    /// Package segment before `/` equals the package name.
    Package,
}

impl AccessibilityMatch {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "prefix" => Some(Self::Prefix),
            "package" | "boundary" | "exact" => Some(Self::Package),
            _ => None,
        }
    }
}

impl AccessibilityState {
    /// Read the accessibility settings. An unreadable flag counts as
    /// disabled; an unset services list with the flag on counts as
    /// unparsable.
    pub fn read(platform: &dyn Platform) -> Self {
        let enabled = match platform.accessibility_enabled() {
            Ok(flag) => flag,
            Err(e) => {
                tracing::warn!(error = %e, "accessibility flag unreadable, assuming disabled");
                return Self::Disabled;
            }
        };
        if enabled == 0 {
            return Self::Disabled;
        }

        match platform.enabled_accessibility_services() {
            Ok(Some(services)) => Self::Services(
                services.split(':').map(str::to_string).collect(),
            ),
            Ok(None) => {
                tracing::debug!("accessibility enabled but services list unset");
                Self::Unparsable
            }
            Err(e) => {
                tracing::warn!(error = %e, "accessibility settings unreadable, assuming disabled");
                Self::Disabled
            }
        }
    }

    /// True if any enabled service belongs to a package other than
    /// `own_package`.
    pub fn enabled_for_subject(&self, own_package: &str) -> bool {
        match self {
            Self::Disabled => false,
            Self::Unparsable => true,
            Self::Services(entries) => entries.iter().any(|entry| {
                let package = package_segment(entry);
                !package.trim().is_empty() && package != own_package
            }),
        }
    }

    /// True if an enabled service is attributed to `package` under `mode`.
    /// A blank package is never attributed a service.
    pub fn enabled_for_app(&self, package: &str, mode: AccessibilityMatch) -> bool {
        if package.trim().is_empty() {
            return false;
        }
        match self {
            Self::Disabled => false,
            Self::Unparsable => true,
            Self::Services(entries) => entries.iter().any(|entry| match mode {
                AccessibilityMatch::Prefix => entry.starts_with(package),
                AccessibilityMatch::Package => package_segment(entry) == package,
            }),
        }
    }
}

fn package_segment(entry: &str) -> &str {
    entry.split_once('/').map_or(entry, |(package, _)| package)
}
