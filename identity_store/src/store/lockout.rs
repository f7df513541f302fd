use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::IdentityError;
use crate::types::User;

use super::{IdentityStore, require_user};

/// Failed-access counting and lockout state.
///
/// The store only records state; deciding when a user is locked out is left to
/// the caller. A `lockout_end_utc` at or before now means "not locked".
#[async_trait]
pub trait LockoutStore: Send + Sync + 'static {
    async fn get_lockout_end_utc(&self, user: &User) -> Result<DateTime<Utc>, IdentityError>;
    /// Persists the whole user row
    async fn set_lockout_end_utc(
        &self,
        user: &mut User,
        lockout_end: DateTime<Utc>,
    ) -> Result<(), IdentityError>;
    /// Adds one failed attempt, persists it and returns the new count
    async fn increment_access_failed_count(&self, user: &mut User) -> Result<u32, IdentityError>;
    /// Persists a count of zero
    async fn reset_access_failed_count(&self, user: &mut User) -> Result<(), IdentityError>;
    async fn get_access_failed_count(&self, user: &User) -> Result<u32, IdentityError>;
    async fn get_lockout_enabled(&self, user: &User) -> Result<bool, IdentityError>;
    /// Persists the whole user row
    async fn set_lockout_enabled(&self, user: &mut User, enabled: bool)
    -> Result<(), IdentityError>;
}

#[async_trait]
impl LockoutStore for IdentityStore {
    async fn get_lockout_end_utc(&self, user: &User) -> Result<DateTime<Utc>, IdentityError> {
        require_user(user)?;
        Ok(user.lockout_end_utc)
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn set_lockout_end_utc(
        &self,
        user: &mut User,
        lockout_end: DateTime<Utc>,
    ) -> Result<(), IdentityError> {
        self.update_with(user, move |user| user.lockout_end_utc = lockout_end)
            .await
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn increment_access_failed_count(&self, user: &mut User) -> Result<u32, IdentityError> {
        self.update_with(user, |user| {
            user.access_failed_count = user.access_failed_count.saturating_add(1)
        })
        .await?;

        tracing::debug!(count = user.access_failed_count, "Recorded failed access");
        Ok(user.access_failed_count)
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn reset_access_failed_count(&self, user: &mut User) -> Result<(), IdentityError> {
        self.update_with(user, |user| user.access_failed_count = 0)
            .await
    }

    async fn get_access_failed_count(&self, user: &User) -> Result<u32, IdentityError> {
        require_user(user)?;
        Ok(user.access_failed_count)
    }

    async fn get_lockout_enabled(&self, user: &User) -> Result<bool, IdentityError> {
        require_user(user)?;
        Ok(user.lockout_enabled)
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn set_lockout_enabled(
        &self,
        user: &mut User,
        enabled: bool,
    ) -> Result<(), IdentityError> {
        self.update_with(user, move |user| user.lockout_enabled = enabled)
            .await
    }
}
