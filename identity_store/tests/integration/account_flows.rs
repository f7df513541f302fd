use std::collections::HashMap;
use std::error::Error as _;
use std::sync::Arc;

use identity_store::{
    AccountError, AccountService, IdentityError, IdentityResult, LockoutPolicy, PasswordHasher,
    RoleAdminStore, User,
};

use crate::common::{GOOD_PASSWORD, admin_role, google_login, setup_service, setup_store};

/// Stores passwords reversed; only for checking that the service goes through the trait
struct ReversingHasher;

impl PasswordHasher for ReversingHasher {
    fn hash_password(&self, password: &str) -> Result<String, AccountError> {
        Ok(password.chars().rev().collect())
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        password.chars().rev().collect::<String>() == password_hash
    }
}

#[tokio::test]
async fn test_register_and_sign_in() {
    let service = setup_service().await;
    let mut user = User::new("alice");

    let result = service
        .register_user(&mut user, GOOD_PASSWORD)
        .await
        .expect("Registration failed");
    assert!(result.succeeded());

    let signed_in = service
        .find_user("alice", GOOD_PASSWORD)
        .await
        .expect("Lookup failed")
        .expect("Correct password should sign in");
    assert_eq!(signed_in.id, user.id);

    assert!(
        service
            .find_user("alice", "wrong password")
            .await
            .expect("Lookup failed")
            .is_none()
    );
}

#[tokio::test]
async fn test_custom_hasher_is_used() {
    let service = AccountService::new(setup_store().await).with_hasher(Arc::new(ReversingHasher));
    let mut user = User::new("alice");

    service
        .register_user(&mut user, "abcdef")
        .await
        .expect("Registration failed");

    assert_eq!(user.password_hash.as_deref(), Some("fedcba"));
    assert!(
        service
            .find_user("alice", "abcdef")
            .await
            .expect("Lookup failed")
            .is_some()
    );
}

#[tokio::test]
async fn test_workflow_rejections_are_results() {
    let service = setup_service().await;
    let mut user = User::new("alice");
    service
        .register_user(&mut user, GOOD_PASSWORD)
        .await
        .expect("Registration failed");

    let taken = service
        .register_user(&mut User::new("alice"), GOOD_PASSWORD)
        .await
        .expect("Registration should not error");
    assert_eq!(taken.errors(), ["Name alice is already taken.".to_string()]);

    let wrong = service
        .change_password(&user.id, "not my password", "another good one")
        .await
        .expect("Change should not error");
    assert_eq!(wrong, IdentityResult::failed("Incorrect password."));

    service
        .add_login(&user.id, &google_login())
        .await
        .expect("add_login failed");
    let linked = service
        .add_login(&user.id, &google_login())
        .await
        .expect("add_login should not error");
    assert!(!linked.succeeded());
}

#[tokio::test]
async fn test_lockout_after_max_failures() {
    let service = setup_service().await.with_policy(LockoutPolicy {
        max_failed_access_attempts: 2,
        ..LockoutPolicy::default()
    });
    let mut user = User::new("alice");
    service
        .register_user(&mut user, GOOD_PASSWORD)
        .await
        .expect("Registration failed");

    service.access_failed(&user.id).await.expect("access_failed failed");
    assert!(!service.is_locked_out(&user.id).await.expect("check failed"));

    service.access_failed(&user.id).await.expect("access_failed failed");
    assert!(service.is_locked_out(&user.id).await.expect("check failed"));
}

#[tokio::test]
async fn test_failures_are_wrapped_with_original_message() {
    let service = setup_service().await;
    let mut user = User::new("alice");
    service
        .register_user(&mut user, GOOD_PASSWORD)
        .await
        .expect("Registration failed");
    service
        .store()
        .create_role(&admin_role())
        .await
        .expect("Failed to create role");
    let added = service
        .add_user_to_role(&user.id, "admin")
        .await
        .expect("add_user_to_role failed");
    assert!(added.succeeded());
    let again = service
        .add_user_to_role(&user.id, "admin")
        .await
        .expect("add_user_to_role failed");
    assert_eq!(again, IdentityResult::failed("User already in role."));

    let err = service
        .remove_user_roles(&user.id)
        .await
        .expect_err("Role removal is not supported");

    let source = err
        .source()
        .expect("Wrapped error should keep its source")
        .to_string();
    assert_eq!(err.to_string(), source);
    assert!(matches!(
        err.identity_error(),
        Some(IdentityError::NotImplemented(_))
    ));
}

#[tokio::test]
async fn test_service_from_named_connection_string() {
    let connections: HashMap<String, String> = HashMap::new();
    let err = AccountService::from_config(&connections, "DefaultConnection")
        .err()
        .expect("Missing connection string should fail");
    assert!(matches!(
        err.identity_error(),
        Some(IdentityError::Configuration(_))
    ));
}
