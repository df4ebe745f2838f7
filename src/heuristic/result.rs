use serde::{Deserialize, Serialize};

use super::confidence;

/// Verdict for the application running the evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// The platform could not report an installer.
    pub installer_unknown: bool,
    /// An installer was reported and it is not allowlisted.
    pub sideload_detected: bool,
    /// A third-party accessibility service is enabled.
    pub accessibility_enabled: bool,
    pub install_source: Option<String>,
    pub message: String,
    pub has_risk: bool,
    /// Heuristic confidence in `[0, 1]`.
    pub confidence: f64,
}

impl DetectionResult {
    /// Degraded result for an evaluation that could not complete.
    pub fn fallback(cause: &str) -> Self {
        Self {
            installer_unknown: false,
            sideload_detected: false,
            accessibility_enabled: false,
            install_source: None,
            message: format!("Error detecting install source: {}", cause),
            has_risk: false,
            confidence: confidence::FALLBACK,
        }
    }
}

/// Fleet verdict for one installed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDetectionResult {
    pub package_name: String,
    pub installer: Option<String>,
    pub is_sideloaded: bool,
    pub is_installer_unknown: bool,
    pub is_accessibility_enabled: bool,
}

/// Device-wide fleet verdict. `apps` holds flagged apps only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDetectionResult {
    pub apps: Vec<AppDetectionResult>,
    pub confidence: f64,
    pub message: String,
}

impl DeviceDetectionResult {
    /// Degraded result for an enumeration that could not complete.
    pub fn fallback(cause: &str) -> Self {
        Self {
            apps: Vec::new(),
            confidence: confidence::FALLBACK,
            message: format!("Error enumerating installed apps: {}", cause),
        }
    }
}
