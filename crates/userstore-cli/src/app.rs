//! Application wiring.

use crate::Command;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use userstore_config::AppConfig;
use userstore_core::{StoreResult, User};
use userstore_repository::{ConnectionManager, MySqlUserRepository, UserRepository};

/// Result of a command, printed as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Output {
    /// A single user.
    User(User),
    /// Every stored user.
    Users(Vec<User>),
}

/// Wired application: the connection manager and the repository built on it.
pub struct App {
    manager: Option<Arc<ConnectionManager>>,
    repository: Arc<dyn UserRepository>,
}

impl App {
    /// Builds the manager from `config` and a MySQL repository on top of it.
    pub async fn bootstrap(config: &AppConfig) -> StoreResult<Self> {
        let manager = Arc::new(ConnectionManager::from_config(config));
        let repository = MySqlUserRepository::new(&manager).await?;
        info!("Application wired");

        Ok(Self {
            manager: Some(manager),
            repository: Arc::new(repository),
        })
    }

    /// Uses an existing repository, with no manager to shut down.
    #[must_use]
    pub fn with_repository(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            manager: None,
            repository,
        }
    }

    /// Runs one command against the repository.
    pub async fn execute(&self, command: &Command) -> StoreResult<Output> {
        match command {
            Command::Create { name } => {
                let user = self.repository.create(name).await?;
                info!("Created user {}", user);
                Ok(Output::User(user))
            }
            Command::List => {
                let users = self.repository.list().await?;
                debug!(count = users.len(), "Listed users");
                Ok(Output::Users(users))
            }
            Command::Get { id } => {
                let user = self.repository.get(*id).await?;
                debug!("Fetched user {}", user);
                Ok(Output::User(user))
            }
        }
    }

    /// Closes the shared pool if it was ever opened.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.manager.as_ref().and_then(|m| m.get()) {
            handle.close().await;
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}
