//! Schema owned by the user store.

use crate::DatabaseHandle;
use tracing::{debug, Instrument};
use userstore_core::StoreResult;

/// Idempotent creation statement for the `users` table.
pub const CREATE_USERS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS users (
    ID INT NOT NULL AUTO_INCREMENT,
    Name VARCHAR(100) NOT NULL,
    PRIMARY KEY (ID)
)";

/// Creates the `users` table unless it already exists.
///
/// Safe to run on every startup; existing rows are left untouched.
pub async fn ensure_schema(handle: &DatabaseHandle) -> StoreResult<()> {
    sqlx::query(CREATE_USERS_TABLE)
        .execute(handle.pool())
        .instrument(handle.query_span("CREATE TABLE", CREATE_USERS_TABLE))
        .await?;
    debug!("users table ensured");
    Ok(())
}
