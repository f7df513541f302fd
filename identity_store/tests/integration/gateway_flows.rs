use std::collections::HashMap;
use std::time::Duration;

use identity_store::{
    DEFAULT_CONNECTION_NAME, Database, IdentityError, IdentityStore, Params, UserStore,
    tables::{RoleTable, UserTable},
};

use crate::common::{TestUsers, admin_role, setup_database};

#[tokio::test]
async fn test_blank_statement_is_rejected() {
    let database = setup_database().await;

    let err = database
        .query("  ", &Params::new())
        .await
        .expect_err("Blank statement should fail");
    assert!(matches!(err, IdentityError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_placeholder_mismatch_is_rejected() {
    let database = setup_database().await;

    let missing = database
        .query_scalar("SELECT Name FROM Roles WHERE Id = @id", &Params::new())
        .await
        .expect_err("Missing parameter should fail");
    assert!(matches!(missing, IdentityError::InvalidArgument(_)));

    let unused = database
        .execute(
            "DELETE FROM Roles WHERE Id = @id",
            &Params::new().with("@id", "r1").with("@name", "admin"),
        )
        .await
        .expect_err("Unused parameter should fail");
    assert!(matches!(unused, IdentityError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_rows_map_to_text() {
    let database = setup_database().await;
    let users = UserTable::new(database.clone());
    users
        .insert(&TestUsers::fully_populated())
        .await
        .expect("Failed to insert user");

    let rows = database
        .query(
            "SELECT UserName, TwoFactorEnabled, AccessFailedCount FROM Users WHERE Id = @id",
            &Params::new().with("@id", "u-full"),
        )
        .await
        .expect("Query failed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("username"), Some("bob"));
    assert_eq!(rows[0].get("TwoFactorEnabled"), Some("1"));
    assert_eq!(rows[0].get("AccessFailedCount"), Some("4"));
}

#[tokio::test]
async fn test_table_gateways_share_database() {
    let database = setup_database().await;
    let roles = RoleTable::new(database.clone());
    roles.insert(&admin_role()).await.expect("Failed to insert role");

    let store = IdentityStore::new(database);
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");

    assert_eq!(
        roles.get_id_by_name("admin").await.expect("Lookup failed"),
        Some("r-admin".to_string())
    );
    let count = store
        .database()
        .query_scalar("SELECT COUNT(*) FROM Users", &Params::new())
        .await
        .expect("Count failed");
    assert_eq!(count, Some("1".to_string()));
}

#[tokio::test]
async fn test_acquisition_retries_then_fails() {
    sqlx::any::install_default_drivers();
    let pool = sqlx::any::AnyPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy("sqlite:/missing-identity-dir/identity.db")
        .expect("Lazy pool should build");
    let database = Database::from_pool(pool).with_retry(2, Duration::from_millis(1));

    let err = database
        .execute("SELECT 1", &Params::new())
        .await
        .expect_err("Unreachable database should fail");
    match err {
        IdentityError::Storage(message) => assert!(message.contains("after 2 attempts")),
        other => panic!("Expected Storage error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_store_from_named_connection_string() {
    let mut connections = HashMap::new();
    connections.insert(
        DEFAULT_CONNECTION_NAME.to_string(),
        "sqlite::memory:".to_string(),
    );

    let store = IdentityStore::from_config(&connections, DEFAULT_CONNECTION_NAME)
        .expect("Store should build");
    store.init().await.expect("Schema creation failed");
    store
        .create(&TestUsers::alice())
        .await
        .expect("Failed to create user");
    assert!(store.find_by_id("u1").await.expect("Lookup failed").is_some());

    let missing = IdentityStore::from_config(&connections, "Reporting")
        .expect_err("Unknown connection name should fail");
    assert!(matches!(missing, IdentityError::Configuration(_)));
}
