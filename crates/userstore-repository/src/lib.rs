//! # Userstore Repository
//!
//! Data access for the `users` table:
//!
//! ```text
//! caller
//!   ↓  Arc<dyn UserRepository>   (domain interface)
//! MySqlUserRepository            (schema ensure + statements)
//!   ↓  Arc<DatabaseHandle>       (shared pool)
//! ConnectionManager              (one-time lazy initialization)
//!   ↓
//! MySQL
//! ```

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
