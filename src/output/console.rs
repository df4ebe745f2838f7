use crate::heuristic::{AppDetectionResult, DetectionResult, DeviceDetectionResult};
use crate::ScanReport;

/// Render a scan report as plain console text.
pub fn render(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n  Device: {}\n", report.target_name));

    if let Some(subject) = &report.subject {
        render_subject(&mut output, subject);
    }
    if let Some(fleet) = &report.fleet {
        render_fleet(&mut output, fleet);
    }

    let status = if report.pass { "PASS" } else { "RISK" };
    output.push_str(&format!("\n  Result: {}\n\n", status));

    output
}

fn render_subject(output: &mut String, result: &DetectionResult) {
    let tag = if result.has_risk { "[RISK]" } else { "[OK]  " };
    output.push_str(&format!(
        "\n  {} {} (confidence {:.2})\n",
        tag, result.message, result.confidence
    ));
    output.push_str(&format!(
        "         installer: {}\n",
        result.install_source.as_deref().unwrap_or("unknown")
    ));
    if result.accessibility_enabled {
        output.push_str("         third-party accessibility service enabled\n");
    }
}

fn render_fleet(output: &mut String, result: &DeviceDetectionResult) {
    output.push_str(&format!(
        "\n  {} (confidence {:.2})\n",
        result.message, result.confidence
    ));
    for app in &result.apps {
        output.push_str(&format!("    {} {}\n", app_tag(app), app.package_name));
        output.push_str(&format!(
            "               installer: {}\n",
            app.installer.as_deref().unwrap_or("unknown")
        ));
        if app.is_accessibility_enabled {
            output.push_str("               accessibility service enabled\n");
        }
    }
}

fn app_tag(app: &AppDetectionResult) -> &'static str {
    if app.is_sideloaded {
        "[SIDELOAD]"
    } else {
        "[UNKNOWN] "
    }
}
