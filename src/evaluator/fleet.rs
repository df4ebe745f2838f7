use crate::heuristic::{
    classify_installer, confidence, installer, AccessibilityMatch, AccessibilityState,
    Allowlist, AppDetectionResult, DeviceDetectionResult,
};
use crate::platform::Platform;

/// Evaluates every installed application on the device.
pub struct FleetEvaluator<'p> {
    platform: &'p dyn Platform,
    allowlist: Allowlist,
    accessibility_match: AccessibilityMatch,
}

impl<'p> FleetEvaluator<'p> {
    /// Evaluator with the default allowlist and prefix accessibility match.
    pub fn new(platform: &'p dyn Platform) -> Self {
        Self::with_allowlist(platform, Allowlist::default())
    }

    pub fn with_allowlist(platform: &'p dyn Platform, allowlist: Allowlist) -> Self {
        Self {
            platform,
            allowlist,
            accessibility_match: AccessibilityMatch::default(),
        }
    }

    pub fn accessibility_match(mut self, mode: AccessibilityMatch) -> Self {
        self.accessibility_match = mode;
        self
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    pub fn replace_allowlist(&mut self, allowlist: Allowlist) {
        self.allowlist = allowlist;
    }

    /// Evaluate all apps against the evaluator's allowlist.
    pub fn detect_all(&self) -> DeviceDetectionResult {
        self.detect_all_with(&self.allowlist)
    }

    /// Evaluate all apps against a per-call allowlist.
    ///
    /// Installers are resolved with the legacy query only; a failing
    /// per-app lookup counts as an unknown installer.
    pub fn detect_all_with(&self, allowlist: &Allowlist) -> DeviceDetectionResult {
        let apps = match self.platform.installed_apps() {
            Ok(apps) => apps,
            Err(e) => {
                tracing::warn!(error = %e, "app enumeration failed, returning fallback");
                return DeviceDetectionResult::fallback(&e.to_string());
            }
        };

        let accessibility = AccessibilityState::read(self.platform);

        let flagged: Vec<AppDetectionResult> = apps
            .iter()
            .filter_map(|app| {
                let package = app.package_name.as_str();
                let installer = installer::resolve_legacy_installer(self.platform, package);
                let verdict = classify_installer(installer.as_deref(), allowlist);
                if !(verdict.installer_unknown || verdict.sideloaded) {
                    return None;
                }
                Some(AppDetectionResult {
                    package_name: app.package_name.clone(),
                    installer,
                    is_sideloaded: verdict.sideloaded,
                    is_installer_unknown: verdict.installer_unknown,
                    is_accessibility_enabled: accessibility
                        .enabled_for_app(package, self.accessibility_match),
                })
            })
            .collect();

        tracing::debug!(
            total = apps.len(),
            flagged = flagged.len(),
            "fleet evaluated"
        );

        let assessment = confidence::assess_fleet(flagged.len());
        DeviceDetectionResult {
            apps: flagged,
            confidence: assessment.confidence,
            message: assessment.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::testing::FakePlatform;

    fn three_app_device() -> FakePlatform {
        FakePlatform::default()
            .with_app("com.adb.tool", None)
            .with_app("com.whatsapp", Some("com.android.vending"))
            .with_app("com.rat.remote", Some("com.sideload.x"))
    }

    #[test]
    fn flags_unknown_and_sideloaded() {
        let platform = three_app_device();
        let result = FleetEvaluator::new(&platform).detect_all();

        assert_eq!(result.apps.len(), 2);
        assert_eq!(result.apps[0].package_name, "com.adb.tool");
        assert!(result.apps[0].is_installer_unknown);
        assert!(!result.apps[0].is_sideloaded);
        assert_eq!(result.apps[1].package_name, "com.rat.remote");
        assert!(result.apps[1].is_sideloaded);
        assert_eq!(result.apps[1].installer.as_deref(), Some("com.sideload.x"));
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn all_allowlisted_is_clean() {
        let platform = FakePlatform::default()
            .with_app("com.whatsapp", Some("com.android.vending"))
            .with_app("com.miui.notes", Some("com.xiaomi.market"));
        let result = FleetEvaluator::new(&platform).detect_all();
        assert!(result.apps.is_empty());
        assert_eq!(result.confidence, 0.70);
        assert_eq!(result.message, "No sideloaded apps detected");
    }

    #[test]
    fn failing_lookup_counts_as_unknown() {
        let mut platform = FakePlatform::default().with_app("com.ghost", None);
        platform.legacy.clear();
        let result = FleetEvaluator::new(&platform).detect_all();
        assert_eq!(result.apps.len(), 1);
        assert!(result.apps[0].is_installer_unknown);
        assert_eq!(result.apps[0].installer, None);
    }

    #[test]
    fn ignores_richer_query() {
        let platform = FakePlatform::default()
            .with_app("com.rat.remote", Some("com.sideload.x"))
            .with_install_source(
                "com.rat.remote",
                crate::platform::InstallerQuery::Resolved("com.android.vending".into()),
            );
        let result = FleetEvaluator::new(&platform).detect_all();
        assert_eq!(result.apps.len(), 1);
        assert!(result.apps[0].is_sideloaded);
    }

    #[test]
    fn per_call_allowlist() {
        let platform = three_app_device();
        let evaluator = FleetEvaluator::new(&platform);
        let permissive = Allowlist::new(["com.android.vending", "com.sideload.x"]);
        let result = evaluator.detect_all_with(&permissive);
        assert_eq!(result.apps.len(), 1);
        assert_eq!(result.apps[0].package_name, "com.adb.tool");
        assert_eq!(evaluator.detect_all().apps.len(), 2);
    }

    #[test]
    fn accessibility_attributed_by_prefix() {
        let platform = FakePlatform::default()
            .with_app("com.rat", Some("com.sideload.x"))
            .with_accessibility(1, Some("com.ratatouille/.Svc"));
        let prefix = FleetEvaluator::new(&platform).detect_all();
        assert!(prefix.apps[0].is_accessibility_enabled);

        let strict = FleetEvaluator::new(&platform)
            .accessibility_match(AccessibilityMatch::Package)
            .detect_all();
        assert!(!strict.apps[0].is_accessibility_enabled);
    }

    #[test]
    fn enumeration_failure_returns_fallback() {
        let mut platform = FakePlatform::default();
        platform.apps = None;
        let result = FleetEvaluator::new(&platform).detect_all();
        assert!(result.apps.is_empty());
        assert_eq!(result.confidence, 0.5);
        assert!(result.message.contains("package manager died"));
    }
}
