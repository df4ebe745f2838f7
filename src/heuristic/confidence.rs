//! Deterministic scoring from boolean signals to a confidence and message.

pub const SIDELOAD_AND_ACCESSIBILITY: f64 = 0.98;
pub const SIDELOAD: f64 = 0.95;
pub const ACCESSIBILITY: f64 = 0.85;
pub const NO_RISK: f64 = 0.70;
/// Undetermined: evaluation failed, nothing was concluded.
pub const FALLBACK: f64 = 0.5;

pub const FLEET_FLAGGED: f64 = 0.95;
pub const FLEET_CLEAN: f64 = 0.70;

/// Confidence and human-readable message for one verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub confidence: f64,
    pub message: String,
}

/// Score a single-subject verdict.
pub fn assess(is_sideload: bool, is_accessibility: bool, installer: Option<&str>) -> Assessment {
    let installer_text = installer.unwrap_or("null");
    let (confidence, message) = match (is_sideload, is_accessibility) {
        (true, true) => (
            SIDELOAD_AND_ACCESSIBILITY,
            format!(
                "Sideloaded & Accessibility service enabled (installer={})",
                installer_text
            ),
        ),
        (true, false) => (
            SIDELOAD,
            format!("Sideloaded app detected (installer={})", installer_text),
        ),
        (false, true) => (ACCESSIBILITY, "Accessibility service enabled on device".into()),
        (false, false) => match installer {
            Some(installer) => (NO_RISK, format!("Installed via {}", installer)),
            None => (NO_RISK, "Installer unknown".into()),
        },
    };
    Assessment {
        confidence,
        message,
    }
}

/// Score a device-wide fleet verdict from the number of flagged apps.
pub fn assess_fleet(flagged: usize) -> Assessment {
    if flagged == 0 {
        Assessment {
            confidence: FLEET_CLEAN,
            message: "No sideloaded apps detected".into(),
        }
    } else {
        Assessment {
            confidence: FLEET_FLAGGED,
            message: format!("{} app(s) installed from unrecognized sources", flagged),
        }
    }
}
