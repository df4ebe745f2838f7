use crate::error::Result;
use crate::heuristic::{
    classify_installer, confidence, installer, AccessibilityState, Allowlist, DetectionResult,
};
use crate::platform::Platform;

/// Evaluates the application that is running the check.
pub struct SubjectEvaluator<'p> {
    platform: &'p dyn Platform,
    allowlist: Allowlist,
}

impl<'p> SubjectEvaluator<'p> {
    /// Evaluator with the default allowlist.
    pub fn new(platform: &'p dyn Platform) -> Self {
        Self::with_allowlist(platform, Allowlist::default())
    }

    pub fn with_allowlist(platform: &'p dyn Platform, allowlist: Allowlist) -> Self {
        Self {
            platform,
            allowlist,
        }
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    pub fn replace_allowlist(&mut self, allowlist: Allowlist) {
        self.allowlist = allowlist;
    }

    /// Evaluate the subject. Recomputed on every call.
    pub fn detect(&self) -> DetectionResult {
        match self.try_detect() {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "subject evaluation failed, returning fallback");
                DetectionResult::fallback(&e.to_string())
            }
        }
    }

    fn try_detect(&self) -> Result<DetectionResult> {
        let package = self.platform.own_package()?;

        let installer = installer::resolve_installer(self.platform, &package);
        let verdict = classify_installer(installer.as_deref(), &self.allowlist);
        let accessibility =
            AccessibilityState::read(self.platform).enabled_for_subject(&package);

        let assessment = confidence::assess(verdict.sideloaded, accessibility, installer.as_deref());

        tracing::debug!(
            package = %package,
            installer = installer.as_deref().unwrap_or("-"),
            sideload = verdict.sideloaded,
            accessibility,
            "subject evaluated"
        );

        Ok(DetectionResult {
            installer_unknown: verdict.installer_unknown,
            sideload_detected: verdict.sideloaded,
            accessibility_enabled: accessibility,
            install_source: installer,
            message: assessment.message,
            has_risk: verdict.sideloaded || accessibility,
            confidence: assessment.confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::testing::FakePlatform;
    use crate::platform::InstallerQuery;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    const OWN: &str = "com.example.bank";

    #[test]
    fn play_store_install_is_clean() {
        let platform = FakePlatform::default().with_install_source(
            OWN,
            InstallerQuery::Resolved("com.android.vending".into()),
        );
        let result = SubjectEvaluator::new(&platform).detect();
        assert_eq!(
            result,
            DetectionResult {
                installer_unknown: false,
                sideload_detected: false,
                accessibility_enabled: false,
                install_source: Some("com.android.vending".into()),
                message: "Installed via com.android.vending".into(),
                has_risk: false,
                confidence: 0.70,
            }
        );
    }

    #[test]
    fn unknown_store_is_sideload() {
        let platform = FakePlatform::default().with_legacy(OWN, Some("com.unknown.store"));
        let result = SubjectEvaluator::new(&platform).detect();
        assert!(result.sideload_detected);
        assert!(result.has_risk);
        assert_eq!(result.confidence, 0.95);
        assert!(result.message.contains("Sideloaded app detected"));
    }

    #[test]
    fn adb_install_with_foreign_accessibility() {
        let platform = FakePlatform::default()
            .with_legacy(OWN, None)
            .with_accessibility(1, Some("com.evil.rat/.Overlay"));
        let result = SubjectEvaluator::new(&platform).detect();
        assert!(result.installer_unknown);
        assert!(!result.sideload_detected);
        assert!(result.accessibility_enabled);
        assert!(result.has_risk);
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.install_source, None);
    }

    #[test]
    fn sideload_with_accessibility() {
        let platform = FakePlatform::default()
            .with_legacy(OWN, Some("com.unknown.store"))
            .with_accessibility(1, Some("com.evil.rat/.Overlay"));
        let result = SubjectEvaluator::new(&platform).detect();
        assert_eq!(result.confidence, 0.98);
        assert_eq!(
            result.message,
            "Sideloaded & Accessibility service enabled (installer=com.unknown.store)"
        );
    }

    #[test]
    fn own_accessibility_service_is_not_risk() {
        let platform = FakePlatform::default()
            .with_legacy(OWN, Some("com.android.vending"))
            .with_accessibility(1, Some("com.example.bank/.Helper"));
        let result = SubjectEvaluator::new(&platform).detect();
        assert!(!result.accessibility_enabled);
        assert!(!result.has_risk);
    }

    #[test]
    fn missing_context_returns_fallback() {
        let mut platform = FakePlatform::default().with_legacy(OWN, Some("com.unknown.store"));
        platform.own_package = None;
        let result = SubjectEvaluator::new(&platform).detect();
        assert_eq!(result.confidence, 0.5);
        assert!(!result.has_risk);
        assert!(!result.sideload_detected);
        assert_eq!(result.install_source, None);
        assert!(result.message.starts_with("Error detecting install source:"));
        assert!(result.message.contains("context unavailable"));
    }

    #[test]
    fn replaced_allowlist_applies_to_next_call() {
        let platform = FakePlatform::default().with_legacy(OWN, Some("org.fdroid.fdroid"));
        let mut evaluator = SubjectEvaluator::new(&platform);
        assert!(evaluator.detect().sideload_detected);

        let mut allowlist = evaluator.allowlist().clone();
        allowlist.replace(BTreeSet::from(["org.fdroid.fdroid".to_string()]));
        evaluator.replace_allowlist(allowlist);
        assert!(!evaluator.detect().sideload_detected);
    }
}
