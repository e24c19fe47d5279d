//! Installs the process-wide logging backend.
//!
//! Library code logs through the `log` facade; this feature bridges those
//! records into `tracing` with [`LogTracer`] and installs a
//! `tracing-subscriber` formatter filtered by `RUST_LOG`, falling back to
//! the `logging.level` setting.
use std::sync::atomic::{AtomicBool, Ordering};

use persona_core::feature::{Feature, FeatureManifest, VersionRange};
use persona_core::kernel::bootstrap::Application;
use persona_core::kernel::error::Result as KernelResult;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

const COMPATIBLE_API_REQ: &str = "^0.1";

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Build the filter: `RUST_LOG` wins, then `level`, then `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the backend. Returns `Ok(false)` when a backend is already in
/// place; that is not an error.
pub fn install(level: &str, json: bool) -> Result<bool, String> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        log::debug!("Logging backend already installed, ignoring");
        return Ok(false);
    }

    if let Err(e) = LogTracer::init() {
        log::debug!("log bridge not installed: {}", e);
        return Ok(false);
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(true);
    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    match result {
        Ok(()) => Ok(true),
        Err(e) => Err(format!("failed to install tracing subscriber: {}", e)),
    }
}

#[derive(Debug, Default)]
pub struct LoggingFeature;

impl Feature for LoggingFeature {
    fn name(&self) -> &'static str {
        "core-logging"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn is_core(&self) -> bool {
        true
    }

    fn compatible_api_versions(&self) -> Vec<VersionRange> {
        match VersionRange::from_constraint(COMPATIBLE_API_REQ) {
            Ok(range) => vec![range],
            Err(e) => {
                log::error!(
                    "Failed to parse API version requirement ('{}') for {}: {}",
                    COMPATIBLE_API_REQ,
                    self.name(),
                    e
                );
                vec![]
            }
        }
    }

    fn manifest(&self) -> FeatureManifest {
        FeatureManifest::new(self.name(), self.version())
    }

    fn init(&self, app: &mut Application) -> KernelResult<()> {
        let settings = app.settings();
        match install(&settings.log_level, settings.log_json)? {
            true => tracing::info!(log_level = %settings.log_level, json = settings.log_json, "Logging initialized"),
            false => log::info!("Logging backend was already installed"),
        }
        Ok(())
    }

    fn shutdown(&self) -> KernelResult<()> {
        log::info!("Shutting down core logging");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_metadata() {
        let feature = LoggingFeature;
        assert!(feature.is_core());
        assert_eq!(feature.name(), "core-logging");
        assert_eq!(feature.compatible_api_versions().len(), 1);
        assert!(feature.manifest().menu_items.is_empty());
    }

    #[test]
    fn test_second_install_is_ignored() {
        let first = install("debug", false);
        assert!(first.is_ok());
        assert_eq!(install("debug", false), Ok(false));
        log::info!("logged through the bridge");
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let filter = env_filter("not=a=valid[filter");
        assert!(!filter.to_string().is_empty());
    }
}
