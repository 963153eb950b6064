//! Domain entities of the user store.

mod user;

pub use user::*;
