//! Shared setup for unit tests: every test gets its own in-memory SQLite database.

use sqlx::any::AnyPoolOptions;

use crate::storage::Database;
use crate::store::IdentityStore;

/// Fresh in-memory database with the identity schema created.
///
/// The pool holds a single connection that never expires, so the in-memory
/// database lives as long as the pool.
pub(crate) async fn test_database() -> Database {
    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database");

    let database = Database::from_pool(pool);
    database
        .init_schema()
        .await
        .expect("Failed to create identity schema");
    database
}

pub(crate) async fn test_store() -> IdentityStore {
    IdentityStore::new(test_database().await)
}
