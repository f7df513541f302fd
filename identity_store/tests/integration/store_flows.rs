use chrono::Utc;
use identity_store::{
    Claim, ClaimStore, EmailStore, IdentityError, LockoutStore, LoginStore, PasswordStore,
    PhoneNumberStore, RoleAdminStore, RoleStore, TwoFactorStore, User, UserStore,
};

use crate::common::{TestUsers, admin_role, google_login, setup_store};

#[tokio::test]
async fn test_external_login_scenario() {
    // Given alice with a google login
    let store = setup_store().await;
    let alice = TestUsers::alice();
    store.create(&alice).await.expect("Failed to create alice");
    store
        .add_login(&alice, &google_login())
        .await
        .expect("Failed to add login");

    // When the login is resolved
    let found = store
        .find_by_login(&google_login())
        .await
        .expect("Login lookup failed");

    // Then alice comes back
    let found = found.expect("Login should resolve to a user");
    assert_eq!(found.id, "u1");
    assert_eq!(found.user_name, "alice");
}

#[tokio::test]
async fn test_create_find_round_trip_all_fields() {
    let store = setup_store().await;
    let user = TestUsers::fully_populated();

    store.create(&user).await.expect("Failed to create user");

    let by_id = store.find_by_id(&user.id).await.expect("Lookup failed");
    assert_eq!(by_id.as_ref(), Some(&user));

    let by_name = store.find_by_name("bob").await.expect("Lookup failed");
    assert_eq!(by_name, Some(user));
}

#[tokio::test]
async fn test_boolean_flags_round_trip() {
    let store = setup_store().await;

    for (index, flags) in [
        [true, false, true, false],
        [false, true, false, true],
        [true, true, true, true],
        [false, false, false, false],
    ]
    .into_iter()
    .enumerate()
    {
        let mut user = User::with_id(format!("flags-{index}"), format!("flags-{index}"));
        user.email_confirmed = flags[0];
        user.phone_number_confirmed = flags[1];
        user.two_factor_enabled = flags[2];
        user.lockout_enabled = flags[3];
        store.create(&user).await.expect("Failed to create user");

        let stored = store
            .find_by_id(&user.id)
            .await
            .expect("Lookup failed")
            .expect("User should exist");
        assert_eq!(
            [
                stored.email_confirmed,
                stored.phone_number_confirmed,
                stored.two_factor_enabled,
                stored.lockout_enabled,
            ],
            flags
        );
    }
}

#[tokio::test]
async fn test_password_hash_set_update_get() {
    let store = setup_store().await;
    let mut user = TestUsers::alice();
    store.create(&user).await.expect("Failed to create user");
    assert!(!store.has_password(&user).await.expect("has_password failed"));

    store
        .set_password_hash(&mut user, Some("new-hash".to_string()))
        .await
        .expect("set failed");
    store.update(&user).await.expect("update failed");

    assert_eq!(
        store.get_password_hash(&user).await.expect("get failed"),
        Some("new-hash".to_string())
    );
    assert!(store.has_password(&user).await.expect("has_password failed"));
}

#[tokio::test]
async fn test_access_failed_count_persists() {
    let store = setup_store().await;
    let mut user = TestUsers::alice();
    store.create(&user).await.expect("Failed to create user");

    assert_eq!(
        store
            .increment_access_failed_count(&mut user)
            .await
            .expect("increment failed"),
        1
    );
    assert_eq!(
        store
            .increment_access_failed_count(&mut user)
            .await
            .expect("increment failed"),
        2
    );

    // A fresh copy from storage sees the persisted count
    let mut reloaded = store
        .find_by_id("u1")
        .await
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(reloaded.access_failed_count, 2);

    store
        .reset_access_failed_count(&mut reloaded)
        .await
        .expect("reset failed");
    let reloaded = store
        .find_by_id("u1")
        .await
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(reloaded.access_failed_count, 0);
}

#[tokio::test]
async fn test_lockout_state_machine_data() {
    let store = setup_store().await;
    let mut user = TestUsers::alice();
    store.create(&user).await.expect("Failed to create user");

    // Normal: not locked even with a past end date
    store
        .set_lockout_enabled(&mut user, true)
        .await
        .expect("enable failed");
    assert!(!user.is_locked_out_at(Utc::now()));

    // LockedOut: end date in the future
    store
        .set_lockout_end_utc(&mut user, Utc::now() + chrono::Duration::minutes(5))
        .await
        .expect("set end failed");
    let stored = store
        .find_by_id("u1")
        .await
        .expect("Lookup failed")
        .expect("User should exist");
    assert!(stored.is_locked_out_at(Utc::now()));

    // Back to normal once the end date has passed
    assert!(!stored.is_locked_out_at(Utc::now() + chrono::Duration::minutes(6)));
}

#[tokio::test]
async fn test_roles() {
    let store = setup_store().await;
    let user = TestUsers::alice();
    store.create(&user).await.expect("Failed to create user");
    store
        .create_role(&admin_role())
        .await
        .expect("Failed to create role");

    // Unknown roles are ignored
    store
        .add_to_role(&user, "nonexistent-role")
        .await
        .expect("Unknown role should not fail");
    assert!(store.get_roles(&user).await.expect("get_roles failed").is_empty());

    store
        .add_to_role(&user, "admin")
        .await
        .expect("add_to_role failed");
    assert!(store.is_in_role(&user, "admin").await.expect("is_in_role failed"));

    // Removal is not supported and leaves the link in place
    let err = store
        .remove_from_role(&user, "admin")
        .await
        .expect_err("remove_from_role should fail");
    assert!(matches!(err, IdentityError::NotImplemented(_)));
    assert_eq!(
        store.get_roles(&user).await.expect("get_roles failed"),
        vec!["admin".to_string()]
    );
}

#[tokio::test]
async fn test_claims_and_verification_setters() {
    let store = setup_store().await;
    let mut user = TestUsers::alice();
    store.create(&user).await.expect("Failed to create user");

    store
        .add_claim(&user, &Claim::new("department", "sales"))
        .await
        .expect("add_claim failed");
    store
        .set_email(&mut user, Some("alice@example.com".to_string()))
        .await
        .expect("set_email failed");
    store
        .set_phone_number(&mut user, Some("+15550123".to_string()))
        .await
        .expect("set_phone_number failed");
    store
        .set_two_factor_enabled(&mut user, true)
        .await
        .expect("set_two_factor_enabled failed");

    let stored = store
        .find_by_id("u1")
        .await
        .expect("Lookup failed")
        .expect("User should exist");
    assert_eq!(stored.email.as_deref(), Some("alice@example.com"));
    assert_eq!(stored.phone_number.as_deref(), Some("+15550123"));
    assert!(stored.two_factor_enabled);
    assert_eq!(
        store.get_claims(&stored).await.expect("get_claims failed"),
        vec![Claim::new("department", "sales")]
    );

    // Email lookup is a placeholder that never matches
    assert_eq!(
        store
            .find_by_email("alice@example.com")
            .await
            .expect("find_by_email failed"),
        None
    );
}

#[tokio::test]
async fn test_duplicate_names_hide_user_from_name_lookup() {
    let store = setup_store().await;
    store
        .create(&User::with_id("a", "same"))
        .await
        .expect("Failed to create user");
    store
        .create(&User::with_id("b", "same"))
        .await
        .expect("Failed to create user");

    assert_eq!(store.find_by_name("same").await.expect("Lookup failed"), None);
    assert!(store.find_by_id("a").await.expect("Lookup failed").is_some());
}
