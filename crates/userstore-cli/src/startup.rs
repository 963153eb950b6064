//! Logging bootstrap for the composition root.

use std::path::Path;
use tracing::{debug, info};
use userstore_config::AppConfig;
use userstore_core::telemetry::{init_telemetry, TelemetryConfig};
use userstore_core::StoreResult;

/// Installs the global subscriber for the outcome of configuration loading.
///
/// With a loaded config, telemetry is set up from its tracing settings and
/// any failure is returned. Without one, a console-only subscriber is
/// installed so the configuration error can still be logged; if that fails
/// too, the reason goes to stderr and `Ok` is returned, leaving the original
/// error to the caller.
pub fn init_logging(loaded: &StoreResult<AppConfig>) -> StoreResult<()> {
    match loaded {
        Ok(config) => init_telemetry(&config.tracing.telemetry()),
        Err(_) => {
            if let Err(e) = init_telemetry(&TelemetryConfig::default()) {
                eprintln!("Failed to initialize logging: {e}");
            }
            Ok(())
        }
    }
}

/// Logs what configuration loading found. Call after [`init_logging`].
pub fn log_loaded(config: &AppConfig, env_file: Option<&Path>) {
    match env_file {
        Some(path) => debug!(path = %path.display(), "Loaded .env file"),
        None => debug!("No .env file loaded"),
    }
    info!(
        database = %config.database.redacted_url(),
        tracing_enabled = config.tracing.is_enabled(),
        "Configuration loaded"
    );
}
