use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Official app-store and OEM-store packages trusted as installers.
const DEFAULT_INSTALLERS: &[&str] = &[
    "com.android.vending",
    "com.oppo.store",
    "com.vivo.appstore",
    "com.samsung.android.app.samsungapps",
    "com.samsung.android.apps.securefolder",
    "com.xiaomi.market",
    "com.huawei.appmarket",
    "com.realme.appstore",
    "com.lenovo.store",
    "com.sec.android.easyMover",
];

static DEFAULT_ALLOWLIST: Lazy<BTreeSet<String>> =
    Lazy::new(|| DEFAULT_INSTALLERS.iter().map(|s| s.to_string()).collect());

/// Installer identities treated as trustworthy.
///
/// Membership is exact string equality. Entries are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allowlist {
    installers: BTreeSet<String>,
}

impl Allowlist {
    pub fn new<I, S>(installers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installers: installers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self) -> &BTreeSet<String> {
        &self.installers
    }

    /// Replace the whole set.
    pub fn replace(&mut self, installers: BTreeSet<String>) {
        self.installers = installers;
    }

    pub fn extend<I, S>(&mut self, installers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.installers
            .extend(installers.into_iter().map(Into::into));
    }

    pub fn contains(&self, installer: &str) -> bool {
        self.installers.contains(installer)
    }

    pub fn len(&self) -> usize {
        self.installers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installers.is_empty()
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self {
            installers: DEFAULT_ALLOWLIST.clone(),
        }
    }
}
