//! Shared database handle and its one-time initialization.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, warn, Instrument, Span};
use userstore_config::{AppConfig, DatabaseConfig, TracingConfig};
use userstore_core::StoreResult;

/// `db.system` value reported on spans of an instrumented handle.
pub const DB_SYSTEM_MYSQL: &str = "mysql";

/// Fixed connection pool limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    /// Maximum lifetime of a single connection.
    pub max_lifetime: Duration,
    /// Maximum number of open connections.
    pub max_open: u32,
    /// Maximum number of idle connections.
    pub max_idle: u32,
}

impl PoolLimits {
    /// Limits applied to every handle.
    pub const FIXED: Self = Self {
        max_lifetime: Duration::from_secs(3 * 60),
        max_open: 10,
        max_idle: 10,
    };

    /// Pool options enforcing these limits.
    ///
    /// sqlx never keeps more idle connections than `max_connections`, so
    /// `max_idle` is honoured as long as it does not exceed `max_open`.
    #[must_use]
    pub fn pool_options(&self) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .min_connections(0)
            .max_connections(self.max_open)
            .max_lifetime(self.max_lifetime)
            .idle_timeout(None::<Duration>)
    }
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self::FIXED
    }
}

/// Tags attached to the spans of an instrumented handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrumentation {
    /// Service the spans belong to.
    pub service_name: String,
    /// Storage system identity (`db.system`).
    pub db_system: &'static str,
}

impl Instrumentation {
    /// Instrumentation for a MySQL handle.
    #[must_use]
    pub fn mysql(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            db_system: DB_SYSTEM_MYSQL,
        }
    }
}

/// Pooled connections to one database, safe to share across tasks.
pub struct DatabaseHandle {
    pool: MySqlPool,
    limits: PoolLimits,
    instrumentation: Option<Instrumentation>,
}

impl DatabaseHandle {
    /// Wraps an existing pool.
    #[must_use]
    pub fn new(pool: MySqlPool, limits: PoolLimits, instrumentation: Option<Instrumentation>) -> Self {
        Self {
            pool,
            limits,
            instrumentation,
        }
    }

    /// Returns the underlying MySQL pool.
    #[must_use]
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Returns the limits the pool was built with.
    #[must_use]
    pub const fn limits(&self) -> PoolLimits {
        self.limits
    }

    /// Returns true if statements run inside tracing spans.
    #[must_use]
    pub const fn is_instrumented(&self) -> bool {
        self.instrumentation.is_some()
    }

    /// Returns the instrumentation tags, if any.
    #[must_use]
    pub fn instrumentation(&self) -> Option<&Instrumentation> {
        self.instrumentation.as_ref()
    }

    /// Span to run `statement` in; disabled for a plain handle.
    #[must_use]
    pub fn query_span(&self, operation: &'static str, statement: &'static str) -> Span {
        match &self.instrumentation {
            Some(tags) => tracing::info_span!(
                "db.query",
                otel.kind = "client",
                otel.name = operation,
                service.name = %tags.service_name,
                db.system = tags.db_system,
                db.operation = operation,
                db.statement = statement,
            ),
            None => Span::none(),
        }
    }

    /// Checks that a connection can be acquired and used.
    pub async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .instrument(self.query_span("SELECT", "SELECT 1"))
            .await?;
        Ok(())
    }

    /// Closes the pool. Left to the composition root at shutdown.
    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

impl std::fmt::Debug for DatabaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseHandle")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .field("limits", &self.limits)
            .field("instrumentation", &self.instrumentation)
            .finish()
    }
}

/// Owns the single shared [`DatabaseHandle`].
///
/// The handle is created on the first call to [`handle`](Self::handle);
/// callers arriving while that setup runs wait for it, and every caller gets
/// the same `Arc`. A failed setup leaves the manager uninitialized and the
/// error is returned to the caller.
pub struct ConnectionManager {
    database: DatabaseConfig,
    tracing: TracingConfig,
    limits: PoolLimits,
    handle: OnceCell<Arc<DatabaseHandle>>,
}

impl ConnectionManager {
    /// Creates an uninitialized manager.
    #[must_use]
    pub fn new(database: DatabaseConfig, tracing: TracingConfig) -> Self {
        Self {
            database,
            tracing,
            limits: PoolLimits::FIXED,
            handle: OnceCell::new(),
        }
    }

    /// Creates an uninitialized manager from loaded application config.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.database.clone(), config.tracing.clone())
    }

    /// Returns the shared handle, creating it on first use.
    pub async fn handle(&self) -> StoreResult<Arc<DatabaseHandle>> {
        let handle = self
            .handle
            .get_or_try_init(|| async { self.open() })
            .await?;
        Ok(Arc::clone(handle))
    }

    /// Returns true once the handle has been created.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.handle.initialized()
    }

    /// Returns the handle if it has already been created.
    #[must_use]
    pub fn get(&self) -> Option<Arc<DatabaseHandle>> {
        self.handle.get().cloned()
    }

    fn open(&self) -> StoreResult<Arc<DatabaseHandle>> {
        info!(
            database = %self.database.redacted_url(),
            max_open = self.limits.max_open,
            max_idle = self.limits.max_idle,
            max_lifetime_secs = self.limits.max_lifetime.as_secs(),
            "Creating MySQL connection pool"
        );

        if let Err(e) = self.database.validate() {
            warn!("Failed to create database handle: {}", e);
            return Err(e);
        }

        // Connections are established on first use, not here.
        let pool = self
            .limits
            .pool_options()
            .connect_lazy_with(self.database.connect_options());

        let instrumentation = if self.tracing.is_enabled() {
            let service_name = self.tracing.service_name.clone().unwrap_or_default();
            info!(service_name = %service_name, db_system = DB_SYSTEM_MYSQL, "Database handle instrumented for tracing");
            Some(Instrumentation::mysql(service_name.trim()))
        } else {
            None
        };

        Ok(Arc::new(DatabaseHandle::new(pool, self.limits, instrumentation)))
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("database", &self.database)
            .field("tracing", &self.tracing)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
