use identity_store::{AccountService, Database, IdentityStore};
use sqlx::any::AnyPoolOptions;

/// In-memory database with the identity schema in place
pub async fn setup_database() -> Database {
    sqlx::any::install_default_drivers();

    // A single connection that never expires keeps the in-memory database alive
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

pub async fn setup_store() -> IdentityStore {
    IdentityStore::new(setup_database().await)
}

pub async fn setup_service() -> AccountService {
    AccountService::new(setup_store().await)
}
