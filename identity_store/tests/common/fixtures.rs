use identity_store::{Role, User, UserLoginInfo};

/// Test user fixtures
pub struct TestUsers;

impl TestUsers {
    /// The user from the external-login scenario
    pub fn alice() -> User {
        User::with_id("u1", "alice")
    }

    /// A user with every optional field and flag set
    pub fn fully_populated() -> User {
        let mut user = User::with_id("u-full", "bob");
        user.email = Some("bob@example.com".to_string());
        user.email_confirmed = true;
        user.password_hash = Some("stored-hash".to_string());
        user.security_stamp = Some("stamp-1".to_string());
        user.phone_number = Some("+15550100".to_string());
        user.phone_number_confirmed = true;
        user.two_factor_enabled = true;
        user.lockout_enabled = true;
        user.lockout_end_utc = chrono::Utc::now() + chrono::Duration::minutes(15);
        user.access_failed_count = 4;
        user
    }
}

pub fn google_login() -> UserLoginInfo {
    UserLoginInfo::new("google", "g123")
}

pub fn admin_role() -> Role {
    Role::with_id("r-admin", "admin")
}

/// Password long enough for the default policy
pub const GOOD_PASSWORD: &str = "correct horse";
