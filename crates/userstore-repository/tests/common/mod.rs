//! Common test infrastructure for database integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::mysql::Mysql;
use userstore_config::{DatabaseConfig, TracingConfig};
use userstore_repository::{ConnectionManager, MySqlUserRepository};

/// Test database container wrapper.
///
/// Manages a MySQL testcontainer lifecycle and hands out connection managers
/// pointed at it.
pub struct TestDatabase {
    _container: ContainerAsync<Mysql>,
    config: DatabaseConfig,
    manager: Arc<ConnectionManager>,
}

impl TestDatabase {
    /// Creates a new test database with a fresh MySQL container.
    ///
    /// The `users` table is not created here; repository construction does it.
    pub async fn new() -> Self {
        let container = Mysql::default()
            .with_env_var("MYSQL_ROOT_PASSWORD", "testpass")
            .with_env_var("MYSQL_DATABASE", "userstore_test")
            .with_env_var("MYSQL_USER", "userstore")
            .with_env_var("MYSQL_PASSWORD", "userstore")
            .start()
            .await
            .expect("Failed to start MySQL container");

        let port = container
            .get_host_port_ipv4(3306)
            .await
            .expect("Failed to get MySQL port");

        let config = DatabaseConfig {
            user: "userstore".to_string(),
            password: "userstore".to_string(),
            host: "127.0.0.1".to_string(),
            port,
            database: "userstore_test".to_string(),
        };

        let manager = Arc::new(ConnectionManager::new(config.clone(), TracingConfig::default()));
        Self::wait_until_ready(&manager, 30).await;

        Self {
            _container: container,
            config,
            manager,
        }
    }

    /// Returns the shared connection manager.
    pub fn manager(&self) -> Arc<ConnectionManager> {
        Arc::clone(&self.manager)
    }

    /// Returns a fresh, uninitialized manager for the same database,
    /// as a second process start would create.
    pub fn new_manager(&self, tracing: TracingConfig) -> ConnectionManager {
        ConnectionManager::new(self.config.clone(), tracing)
    }

    /// Builds a repository on the shared manager.
    pub async fn repository(&self) -> MySqlUserRepository {
        MySqlUserRepository::new(&self.manager)
            .await
            .expect("Failed to create repository")
    }

    /// Adds a unique index on `Name` so duplicate inserts are rejected.
    pub async fn enforce_unique_names(&self) {
        let handle = self.manager.handle().await.expect("Failed to get handle");
        sqlx::query("ALTER TABLE users ADD UNIQUE INDEX ux_users_name (Name)")
            .execute(handle.pool())
            .await
            .expect("Failed to add unique index");
    }

    /// Polls the database until a statement succeeds.
    async fn wait_until_ready(manager: &ConnectionManager, max_attempts: u32) {
        let handle = manager.handle().await.expect("Failed to create handle");
        let mut attempts = 0;
        loop {
            attempts += 1;
            match handle.health_check().await {
                Ok(()) => return,
                Err(e) => {
                    if attempts >= max_attempts {
                        panic!("Database not ready after {} attempts: {}", max_attempts, e);
                    }
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }
}
