use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Outcome of an account workflow that can be rejected without a storage failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityResult {
    Succeeded,
    Failed(Vec<String>),
}

impl IdentityResult {
    pub fn failed(error: impl Into<String>) -> Self {
        IdentityResult::Failed(vec![error.into()])
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, IdentityResult::Succeeded)
    }

    pub fn errors(&self) -> &[String] {
        match self {
            IdentityResult::Succeeded => &[],
            IdentityResult::Failed(errors) => errors,
        }
    }
}

/// Password and lockout rules applied by the account service
#[derive(Debug, Clone, PartialEq)]
pub struct LockoutPolicy {
    /// Failed attempts that trigger a lockout
    pub max_failed_access_attempts: u32,
    /// How long a triggered lockout lasts
    pub default_lockout_timespan: Duration,
    /// Value of `lockout_enabled` for users created through the service
    pub lockout_enabled_by_default: bool,
    pub required_password_length: usize,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_access_attempts: 5,
            default_lockout_timespan: Duration::minutes(5),
            lockout_enabled_by_default: true,
            required_password_length: 6,
        }
    }
}
