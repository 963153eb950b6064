//! User entity.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a user by the storage engine.
pub type UserId = i64;

/// A stored user.
///
/// `id` is assigned by the storage engine on insert and never changes
/// afterwards; `name` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Server-generated identifier.
    pub id: UserId,

    /// Display name.
    pub name: String,
}

impl User {
    /// Creates a user from its stored parts.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
