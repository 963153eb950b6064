//! MySQL user repository implementation.

use super::schema::ensure_schema;
use crate::{traits::UserRepository, ConnectionManager, DatabaseHandle};
use async_trait::async_trait;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::{debug, info, Instrument};
use userstore_core::{StoreError, StoreResult, User, UserId};

const INSERT_USER: &str = "INSERT INTO users (Name) VALUES (?)";
const SELECT_USERS: &str = "SELECT ID AS id, Name AS name FROM users";
const SELECT_USER_BY_ID: &str = "SELECT ID AS id, Name AS name FROM users WHERE ID = ?";

/// MySQL user repository implementation.
#[derive(Clone)]
pub struct MySqlUserRepository {
    handle: Arc<DatabaseHandle>,
}

impl MySqlUserRepository {
    /// Obtains the shared handle from `manager` and ensures the schema.
    pub async fn new(manager: &ConnectionManager) -> StoreResult<Self> {
        let handle = manager.handle().await?;
        Self::with_handle(handle).await
    }

    /// Ensures the schema on an already obtained handle.
    pub async fn with_handle(handle: Arc<DatabaseHandle>) -> StoreResult<Self> {
        ensure_schema(&handle).await?;
        info!("User repository ready");
        Ok(Self { handle })
    }

    /// Returns the shared handle this repository runs on.
    #[must_use]
    pub fn handle(&self) -> &Arc<DatabaseHandle> {
        &self.handle
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(UserId::from(row.id), row.name)
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, name: &str) -> StoreResult<User> {
        // Unique violations become `Duplicate` through `From<sqlx::Error>`.
        let result = sqlx::query(INSERT_USER)
            .bind(name)
            .execute(self.handle.pool())
            .instrument(self.handle.query_span("INSERT", INSERT_USER))
            .await?;

        let id = UserId::try_from(result.last_insert_id()).map_err(|_| {
            StoreError::Database(sqlx::Error::Protocol(format!(
                "insert id {} out of range",
                result.last_insert_id()
            )))
        })?;

        debug!(id, name, "user created");
        Ok(User::new(id, name))
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(SELECT_USERS)
            .fetch_all(self.handle.pool())
            .instrument(self.handle.query_span("SELECT", SELECT_USERS))
            .await
            .map_err(StoreError::Database)?;

        let users: Vec<User> = rows.into_iter().map(User::from).collect();
        debug!(count = users.len(), "users listed");
        Ok(users)
    }

    async fn get(&self, id: UserId) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(SELECT_USER_BY_ID)
            .bind(id)
            .fetch_optional(self.handle.pool())
            .instrument(self.handle.query_span("SELECT", SELECT_USER_BY_ID))
            .await
            .map_err(StoreError::Database)?;

        let user = row.map(User::from).ok_or(StoreError::NotExists)?;
        debug!(id, "user retrieved");
        Ok(user)
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository")
            .field("handle", &self.handle)
            .finish()
    }
}
