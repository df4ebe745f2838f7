use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::Digest;

use super::{InstallerQuery, InstalledApp, Platform, UnavailableReason};
use crate::error::{GuardError, Result};

/// First SDK level exposing `InstallSourceInfo` (Android 11).
pub const INSTALL_SOURCE_MIN_SDK: u32 = 30;

/// A captured device state, loaded from JSON.
///
/// ```json
/// {
///   "device": "pixel-7",
///   "sdk_int": 34,
///   "own_package": "com.example.bank",
///   "apps": [
///     { "package_name": "com.example.bank", "installer": "com.android.vending" },
///     { "package_name": "com.rat.remote", "installer": "com.sideload.x" }
///   ],
///   "accessibility": { "enabled": 1, "services": "com.rat.remote/.Overlay" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    #[serde(default)]
    pub device: Option<String>,
    pub sdk_int: u32,
    #[serde(default)]
    pub own_package: Option<String>,
    #[serde(default)]
    pub apps: Vec<SnapshotApp>,
    #[serde(default)]
    pub accessibility: Option<AccessibilitySettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotApp {
    #[serde(flatten)]
    pub app: InstalledApp,
    /// Legacy `getInstallerPackageName` value.
    #[serde(default)]
    pub installer: Option<String>,
    /// `InstallSourceInfo.installingPackageName` value.
    #[serde(default)]
    pub installing_package: Option<String>,
    /// Simulates the install-source query raising.
    #[serde(default)]
    pub install_source_error: Option<String>,
}

/// Raw secure settings. A missing block means settings are unreadable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessibilitySettings {
    #[serde(default)]
    pub enabled: i64,
    #[serde(default)]
    pub services: Option<String>,
}

/// [`Platform`] backed by a [`DeviceSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotPlatform {
    snapshot: DeviceSnapshot,
    index: HashMap<String, usize>,
    digest: String,
}

impl SnapshotPlatform {
    /// Build a platform from a parsed snapshot. Package names must be
    /// unique.
    pub fn new(snapshot: DeviceSnapshot) -> Result<Self> {
        let mut index = HashMap::with_capacity(snapshot.apps.len());
        for (i, entry) in snapshot.apps.iter().enumerate() {
            let package = &entry.app.package_name;
            if index.insert(package.clone(), i).is_some() {
                return Err(GuardError::Snapshot {
                    file: "<snapshot>".into(),
                    message: format!("duplicate package_name {}", package),
                });
            }
        }
        let digest = sha256_hex(&serde_json::to_vec(&snapshot)?);
        Ok(Self {
            snapshot,
            index,
            digest,
        })
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file = path.display().to_string();
        Self::from_json(&content).map_err(|e| match e {
            GuardError::Json(err) => GuardError::Snapshot {
                file,
                message: err.to_string(),
            },
            GuardError::Snapshot { message, .. } => GuardError::Snapshot { file, message },
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: DeviceSnapshot = serde_json::from_str(content)?;
        Self::new(snapshot)
    }

    pub fn snapshot(&self) -> &DeviceSnapshot {
        &self.snapshot
    }

    /// SHA-256 of the snapshot's canonical JSON serialization, hex encoded.
    /// Independent of source whitespace and of how the platform was built.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    fn app(&self, package: &str) -> Option<&SnapshotApp> {
        self.index.get(package).map(|&i| &self.snapshot.apps[i])
    }
}

impl Platform for SnapshotPlatform {
    fn own_package(&self) -> Result<String> {
        self.snapshot
            .own_package
            .clone()
            .ok_or_else(|| GuardError::platform("own_package", "snapshot has no own_package"))
    }

    fn install_source(&self, package: &str) -> InstallerQuery {
        if self.snapshot.sdk_int < INSTALL_SOURCE_MIN_SDK {
            return InstallerQuery::Unavailable(UnavailableReason::Unsupported);
        }
        let Some(app) = self.app(package) else {
            return InstallerQuery::Unavailable(UnavailableReason::Failed(format!(
                "package {} not found",
                package
            )));
        };
        if let Some(error) = &app.install_source_error {
            return InstallerQuery::Unavailable(UnavailableReason::Failed(error.clone()));
        }
        match &app.installing_package {
            Some(installer) if !installer.trim().is_empty() => {
                InstallerQuery::Resolved(installer.clone())
            }
            _ => InstallerQuery::Unavailable(UnavailableReason::NotReported),
        }
    }

    fn legacy_installer(&self, package: &str) -> Result<Option<String>> {
        self.app(package)
            .map(|app| app.installer.clone())
            .ok_or_else(|| {
                GuardError::platform("legacy_installer", format!("package {} not found", package))
            })
    }

    fn installed_apps(&self) -> Result<Vec<InstalledApp>> {
        Ok(self.snapshot.apps.iter().map(|a| a.app.clone()).collect())
    }

    fn accessibility_enabled(&self) -> Result<i64> {
        self.snapshot
            .accessibility
            .as_ref()
            .map(|a| a.enabled)
            .ok_or_else(|| GuardError::platform("accessibility_enabled", "settings not captured"))
    }

    fn enabled_accessibility_services(&self) -> Result<Option<String>> {
        self.snapshot
            .accessibility
            .as_ref()
            .map(|a| a.services.clone())
            .ok_or_else(|| {
                GuardError::platform("enabled_accessibility_services", "settings not captured")
            })
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", sha2::Sha256::new().chain_update(bytes).finalize())
}
