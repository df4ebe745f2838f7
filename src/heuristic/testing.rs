use std::collections::HashMap;

use crate::error::{GuardError, Result};
use crate::platform::{InstallerQuery, InstalledApp, Platform, UnavailableReason};

/// In-memory platform for unit tests. Unset facts behave as failing queries.
#[derive(Debug, Clone)]
pub struct FakePlatform {
    pub own_package: Option<String>,
    pub install_sources: HashMap<String, InstallerQuery>,
    pub legacy: HashMap<String, Option<String>>,
    pub apps: Option<Vec<InstalledApp>>,
    pub accessibility_flag: Option<i64>,
    pub services: Option<Option<String>>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            own_package: Some("com.example.bank".into()),
            install_sources: HashMap::new(),
            legacy: HashMap::new(),
            apps: Some(vec![]),
            accessibility_flag: Some(0),
            services: Some(None),
        }
    }
}

impl FakePlatform {
    pub fn with_install_source(mut self, package: &str, query: InstallerQuery) -> Self {
        self.install_sources.insert(package.into(), query);
        self
    }

    pub fn with_legacy(mut self, package: &str, installer: Option<&str>) -> Self {
        self.legacy
            .insert(package.into(), installer.map(str::to_string));
        self
    }

    pub fn with_app(mut self, package: &str, installer: Option<&str>) -> Self {
        self.apps.get_or_insert_with(Vec::new).push(InstalledApp {
            package_name: package.into(),
            label: None,
            system_app: false,
        });
        self.with_legacy(package, installer)
    }

    pub fn with_accessibility(mut self, flag: i64, services: Option<&str>) -> Self {
        self.accessibility_flag = Some(flag);
        self.services = Some(services.map(str::to_string));
        self
    }
}

impl Platform for FakePlatform {
    fn own_package(&self) -> Result<String> {
        self.own_package
            .clone()
            .ok_or_else(|| GuardError::platform("own_package", "context unavailable"))
    }

    fn install_source(&self, package: &str) -> InstallerQuery {
        self.install_sources
            .get(package)
            .cloned()
            .unwrap_or(InstallerQuery::Unavailable(UnavailableReason::Unsupported))
    }

    fn legacy_installer(&self, package: &str) -> Result<Option<String>> {
        self.legacy
            .get(package)
            .cloned()
            .ok_or_else(|| GuardError::platform("legacy_installer", format!("{} not found", package)))
    }

    fn installed_apps(&self) -> Result<Vec<InstalledApp>> {
        self.apps
            .clone()
            .ok_or_else(|| GuardError::platform("installed_apps", "package manager died"))
    }

    fn accessibility_enabled(&self) -> Result<i64> {
        self.accessibility_flag
            .ok_or_else(|| GuardError::platform("accessibility_enabled", "settings unreadable"))
    }

    fn enabled_accessibility_services(&self) -> Result<Option<String>> {
        self.services.clone().ok_or_else(|| {
            GuardError::platform("enabled_accessibility_services", "settings unreadable")
        })
    }
}
