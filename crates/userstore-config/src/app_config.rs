//! Application configuration structures.

use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;
use userstore_core::telemetry::TelemetryConfig;
use userstore_core::{StoreError, StoreResult};

/// Root application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Database target.
    pub database: DatabaseConfig,

    /// Distributed tracing settings.
    pub tracing: TracingConfig,
}

/// Database target, read from the `MYSQL_DB_*` variables.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: String,
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database (schema) name.
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 3306,
            database: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Checks that the fields without a usable default were provided.
    pub fn validate(&self) -> StoreResult<()> {
        if self.user.trim().is_empty() {
            return Err(StoreError::configuration("Database user is required (MYSQL_DB_USER)"));
        }
        if self.database.trim().is_empty() {
            return Err(StoreError::configuration(
                "Database name is required (MYSQL_DB_DATABASE)",
            ));
        }
        if self.host.trim().is_empty() {
            return Err(StoreError::configuration("Database host must not be empty"));
        }
        Ok(())
    }

    /// Builds driver connect options for this target.
    #[must_use]
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    /// Connection URL with the password masked, for logs.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        format!(
            "mysql://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

/// Tracing settings, read from `SERVICE_NAME` and `OTEL_EXPORTER_OTLP_ENDPOINT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracingConfig {
    /// Service name reported with spans.
    pub service_name: Option<String>,
    /// OTLP collector endpoint.
    pub otlp_endpoint: Option<String>,
}

impl TracingConfig {
    /// Tracing is on only when both a service name and an endpoint are set.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        fn present(value: Option<&String>) -> bool {
            value.is_some_and(|v| !v.trim().is_empty())
        }
        present(self.service_name.as_ref()) && present(self.otlp_endpoint.as_ref())
    }

    /// Rejects an endpoint that is not a valid URL when tracing is enabled.
    pub fn validate(&self) -> StoreResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        if let Some(endpoint) = &self.otlp_endpoint {
            url::Url::parse(endpoint.trim()).map_err(|e| {
                StoreError::configuration(format!(
                    "Invalid OTEL_EXPORTER_OTLP_ENDPOINT '{}': {}",
                    endpoint, e
                ))
            })?;
        }
        Ok(())
    }

    /// Converts to the telemetry bootstrap configuration.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryConfig {
        match (&self.service_name, &self.otlp_endpoint) {
            (Some(name), Some(endpoint)) if self.is_enabled() => TelemetryConfig {
                service_name: name.trim().to_string(),
                otlp_endpoint: Some(endpoint.trim().to_string()),
                ..TelemetryConfig::default()
            },
            _ => TelemetryConfig::default(),
        }
    }
}
