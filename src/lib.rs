//! SideloadGuard — sideload and accessibility-abuse heuristics for Android.
//!
//! Flags apps installed outside trusted stores and third-party accessibility
//! services, two signals common to remote-access-trojan fraud. Platform
//! facts come from a [`platform::Platform`]; the bundled
//! [`platform::SnapshotPlatform`] reads a captured device snapshot.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use sideloadguard::{scan, ScanOptions};
//!
//! let options = ScanOptions::default();
//! let report = scan(Path::new("./device.json"), &options).unwrap();
//! println!("Pass: {}", report.pass);
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod heuristic;
pub mod output;
pub mod platform;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use config::Config;
use error::Result;
use evaluator::{FleetEvaluator, SubjectEvaluator};
use heuristic::{AccessibilityMatch, DetectionResult, DeviceDetectionResult};
use output::OutputFormat;
use platform::SnapshotPlatform;

/// Which evaluators a scan runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Subject,
    Fleet,
    All,
}

impl ScanMode {
    pub fn from_str_lenient(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "subject" | "self" => Some(Self::Subject),
            "fleet" | "device" => Some(Self::Fleet),
            "all" | "both" => Some(Self::All),
            _ => None,
        }
    }

    fn runs_subject(self) -> bool {
        matches!(self, Self::Subject | Self::All)
    }

    fn runs_fleet(self) -> bool {
        matches!(self, Self::Fleet | Self::All)
    }
}

/// Options for a scan invocation.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Path to config file (defaults to `.sideloadguard.toml` next to the snapshot).
    pub config_path: Option<PathBuf>,
    pub mode: ScanMode,
    /// CLI override for the fleet accessibility match mode.
    pub accessibility_match_override: Option<AccessibilityMatch>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            mode: ScanMode::All,
            accessibility_match_override: None,
        }
    }
}

/// Complete scan report.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub target_name: String,
    pub snapshot_sha256: String,
    pub scanned_at: DateTime<Utc>,
    pub subject: Option<DetectionResult>,
    pub fleet: Option<DeviceDetectionResult>,
    /// No subject risk and no flagged apps.
    pub pass: bool,
}

/// Run a complete scan: load config and snapshot, run the evaluators.
pub fn scan(path: &Path, options: &ScanOptions) -> Result<ScanReport> {
    let config_path = options.config_path.clone().unwrap_or_else(|| {
        path.parent()
            .unwrap_or_else(|| Path::new("."))
            .join(".sideloadguard.toml")
    });
    let mut config = Config::load(&config_path)?;

    if let Some(mode) = options.accessibility_match_override {
        config.fleet.accessibility_match = mode;
    }

    let platform = SnapshotPlatform::load(path)?;
    let allowlist = config.allowlist();

    let target_name = platform
        .snapshot()
        .device
        .clone()
        .or_else(|| {
            path.file_stem()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "unknown".into());

    tracing::info!(
        device = %target_name,
        mode = ?options.mode,
        allowlist = allowlist.len(),
        "scanning device snapshot"
    );

    let subject = options
        .mode
        .runs_subject()
        .then(|| SubjectEvaluator::with_allowlist(&platform, allowlist.clone()).detect());

    let fleet = options.mode.runs_fleet().then(|| {
        FleetEvaluator::with_allowlist(&platform, allowlist.clone())
            .accessibility_match(config.fleet.accessibility_match)
            .detect_all()
    });

    let pass = !subject.as_ref().is_some_and(|s| s.has_risk)
        && fleet.as_ref().map_or(true, |f| f.apps.is_empty());

    Ok(ScanReport {
        target_name,
        snapshot_sha256: platform.digest().to_string(),
        scanned_at: Utc::now(),
        subject,
        fleet,
        pass,
    })
}

/// Render a scan report in the specified format.
pub fn render_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    output::render(report, format)
}
