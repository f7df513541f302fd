use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a user identity as stored in the `Users` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique user identifier, generated at creation and never changed
    pub id: String,
    /// Login name; expected to be unique but not enforced by the schema
    pub user_name: String,
    pub email: Option<String>,
    pub email_confirmed: bool,
    /// Salted hash of the user's password
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    /// Random value that should change whenever the user's credentials change
    #[serde(skip_serializing, default)]
    pub security_stamp: Option<String>,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub two_factor_enabled: bool,
    /// Whether failed sign-ins can lock this user out
    pub lockout_enabled: bool,
    /// End of the current lockout; any instant in the past means "not locked out"
    pub lockout_end_utc: DateTime<Utc>,
    /// Failed access attempts since the last reset
    pub access_failed_count: u32,
}

impl User {
    /// Create a new user with a freshly generated id
    pub fn new(user_name: impl Into<String>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), user_name)
    }

    /// Create a new user with a caller-chosen id
    pub fn with_id(id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_name: user_name.into(),
            email: None,
            email_confirmed: false,
            password_hash: None,
            security_stamp: None,
            phone_number: None,
            phone_number_confirmed: false,
            two_factor_enabled: false,
            lockout_enabled: false,
            lockout_end_utc: Utc::now(),
            access_failed_count: 0,
        }
    }

    /// True when lockout applies to this user and has not yet expired at `now`
    pub fn is_locked_out_at(&self, now: DateTime<Utc>) -> bool {
        self.lockout_enabled && self.lockout_end_utc > now
    }
}

/// A named role users can be linked to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
}

impl Role {
    /// Create a role with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), name)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A `(type, value)` assertion about a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Claim {
    pub claim_type: String,
    pub claim_value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, claim_value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            claim_value: claim_value.into(),
        }
    }
}

/// Link between a user and an identity at an external provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserLoginInfo {
    /// Provider name, e.g. "google"
    pub login_provider: String,
    /// The user's key at that provider
    pub provider_key: String,
}

impl UserLoginInfo {
    pub fn new(login_provider: impl Into<String>, provider_key: impl Into<String>) -> Self {
        Self {
            login_provider: login_provider.into(),
            provider_key: provider_key.into(),
        }
    }
}
