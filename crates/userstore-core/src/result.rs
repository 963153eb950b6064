//! Result type aliases for the user store.

use crate::StoreError;

/// A specialized `Result` type for data-access operations.
pub type StoreResult<T> = Result<T, StoreError>;
