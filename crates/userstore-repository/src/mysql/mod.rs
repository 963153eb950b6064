//! MySQL repository implementations.

mod schema;
mod user_repository;

pub use schema::*;
pub use user_repository::*;
