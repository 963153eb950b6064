//! Repository trait definitions.

use async_trait::async_trait;
use userstore_core::{StoreResult, User, UserId};

/// User repository trait.
///
/// Implementations report `Duplicate` from [`create`](Self::create) and
/// `NotExists` from [`get`](Self::get); every other failure is surfaced as an
/// opaque database error.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user with `name` and returns it with its assigned id.
    async fn create(&self, name: &str) -> StoreResult<User>;

    /// Returns every stored user in storage order.
    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Returns the user with `id`.
    async fn get(&self, id: UserId) -> StoreResult<User>;
}
