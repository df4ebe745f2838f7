use crate::platform::{InstallerQuery, Platform};

/// Resolve the installer of `package`, preferring the richer install-source
/// query and falling back to the legacy query.
///
/// Returns `None` when neither query yields a non-blank installer.
pub fn resolve_installer(platform: &dyn Platform, package: &str) -> Option<String> {
    match platform.install_source(package) {
        InstallerQuery::Resolved(installer) if !installer.trim().is_empty() => {
            return Some(installer);
        }
        InstallerQuery::Resolved(_) => {
            tracing::debug!(package, "install source blank, using legacy query");
        }
        InstallerQuery::Unavailable(reason) => {
            tracing::debug!(package, %reason, "install source unavailable, using legacy query");
        }
    }

    resolve_legacy_installer(platform, package)
}

/// Resolve the installer using only the legacy query. A failing lookup is
/// treated as an absent installer.
pub fn resolve_legacy_installer(platform: &dyn Platform, package: &str) -> Option<String> {
    match platform.legacy_installer(package) {
        Ok(installer) => installer.filter(|i| !i.trim().is_empty()),
        Err(e) => {
            tracing::debug!(package, error = %e, "legacy installer query failed");
            None
        }
    }
}
