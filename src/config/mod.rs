use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::heuristic::{AccessibilityMatch, Allowlist};

/// Top-level configuration from `.sideloadguard.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub allowlist: AllowlistConfig,
    #[serde(default)]
    pub fleet: FleetConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowlistConfig {
    /// Replaces the built-in installer set entirely.
    #[serde(default)]
    pub installers: Option<Vec<String>>,
    /// Added on top of the resulting set.
    #[serde(default)]
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub accessibility_match: AccessibilityMatch,
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// The effective allowlist after applying `installers` and `extra`.
    pub fn allowlist(&self) -> Allowlist {
        let mut allowlist = match &self.allowlist.installers {
            Some(installers) => Allowlist::new(installers.iter().cloned()),
            None => Allowlist::default(),
        };
        allowlist.extend(self.allowlist.extra.iter().cloned());
        allowlist
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# SideloadGuard configuration

[allowlist]
# Trusted installer packages. Setting this replaces the built-in store list.
# installers = ["com.android.vending", "com.xiaomi.market"]

# Installers trusted in addition to the list above.
# extra = ["org.fdroid.fdroid"]

[fleet]
# How enabled accessibility services are attributed to apps:
# "prefix" matches any service entry starting with the package name,
# "package" requires the package segment to match exactly.
accessibility_match = "prefix"
"#
    }
}
