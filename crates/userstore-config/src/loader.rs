//! Configuration loader backed by environment variables.

use crate::{AppConfig, DatabaseConfig, TracingConfig};
use config::{Config, ConfigError, Environment, Map};
use serde::Deserialize;
use std::path::PathBuf;
use userstore_core::StoreError;

/// Prefix of the database target variables (`MYSQL_DB_USER`, ...).
pub const DATABASE_ENV_PREFIX: &str = "MYSQL_DB";

/// Loads [`AppConfig`] from the process environment or an explicit map.
///
/// Sources:
/// 1. `MYSQL_DB_USER`, `MYSQL_DB_PASSWORD`, `MYSQL_DB_HOST`, `MYSQL_DB_PORT`,
///    `MYSQL_DB_DATABASE`; an empty value counts as unset
/// 2. `SERVICE_NAME` and `OTEL_EXPORTER_OTLP_ENDPOINT`
///
/// Loading emits no log events, since it runs before the subscriber is
/// installed. Callers log the outcome themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

/// Raw tracing variables as seen through their prefixes.
#[derive(Debug, Default, Deserialize)]
struct RawTracing {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    endpoint: Option<String>,
}

impl ConfigLoader {
    /// Merges `.env` from the working directory (or a parent) into the
    /// process environment, returning its path if one was loaded.
    pub fn load_dotenv() -> Option<PathBuf> {
        dotenvy::dotenv().ok()
    }

    /// Loads configuration from the process environment.
    ///
    /// Call [`ConfigLoader::load_dotenv`] first to pick up a `.env` file.
    pub fn from_env() -> Result<AppConfig, StoreError> {
        Self::load(None)
    }

    /// Loads configuration from `vars` instead of the process environment.
    pub fn from_map<I, K, V>(vars: I) -> Result<AppConfig, StoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(Some(map))
    }

    fn load(source: Option<Map<String, String>>) -> Result<AppConfig, StoreError> {
        let database: DatabaseConfig = Config::builder()
            .add_source(
                Environment::with_prefix(DATABASE_ENV_PREFIX)
                    .ignore_empty(true)
                    .source(source.clone()),
            )
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error_to_store_error)?;
        database.validate()?;

        let raw: RawTracing = Config::builder()
            .add_source(Environment::with_prefix("SERVICE").source(source.clone()))
            .add_source(Environment::with_prefix("OTEL_EXPORTER_OTLP").source(source))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error_to_store_error)?;
        let tracing = TracingConfig {
            service_name: raw.name,
            otlp_endpoint: raw.endpoint,
        };
        tracing.validate()?;

        Ok(AppConfig { database, tracing })
    }
}

fn config_error_to_store_error(err: ConfigError) -> StoreError {
    StoreError::Configuration(err.to_string())
}
