use std::sync::Arc;

use chrono::Utc;

use crate::config::ConnectionStringProvider;
use crate::store::{
    IdentityStore, LockoutStore, LoginStore, PasswordStore, RoleStore, SecurityStampStore,
    UserStore,
};
use crate::types::{User, UserLoginInfo};

use super::errors::AccountError;
use super::hasher::{PasswordHasher, Pbkdf2PasswordHasher};
use super::types::{IdentityResult, LockoutPolicy};

const USER_NOT_FOUND: &str = "UserId not found.";

/// Account workflows layered over the identity store.
///
/// Rejected workflows (a taken user name, a weak or wrong password, a login that
/// is already linked) come back as [`IdentityResult::Failed`]; every other failure
/// is an [`AccountError`] wrapping the underlying store error.
#[derive(Clone)]
pub struct AccountService<S = IdentityStore> {
    store: S,
    hasher: Arc<dyn PasswordHasher>,
    policy: LockoutPolicy,
}

impl AccountService<IdentityStore> {
    /// Build a service over the named connection string
    pub fn from_config(
        provider: &dyn ConnectionStringProvider,
        name: &str,
    ) -> Result<Self, AccountError> {
        Ok(Self::new(IdentityStore::from_config(provider, name)?))
    }
}

impl<S> AccountService<S>
where
    S: UserStore + PasswordStore + SecurityStampStore + LoginStore + RoleStore + LockoutStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            hasher: Arc::new(Pbkdf2PasswordHasher),
            policy: LockoutPolicy::default(),
        }
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_policy(mut self, policy: LockoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    /// Create `user` with a hashed password.
    ///
    /// On success the user's password hash, security stamp and lockout flag are
    /// updated in place to what was stored.
    #[tracing::instrument(skip(self, user, password), fields(user_id = %user.id, user_name = %user.user_name))]
    pub async fn register_user(
        &self,
        user: &mut User,
        password: &str,
    ) -> Result<IdentityResult, AccountError> {
        if let Some(rejected) = self.validate_password(password) {
            return Ok(rejected);
        }

        let password_hash = self.hasher.hash_password(password)?;
        self.store
            .set_password_hash(user, Some(password_hash))
            .await?;

        self.create_user(user).await
    }

    /// Create `user` without a password
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id, user_name = %user.user_name))]
    pub async fn create(&self, user: &mut User) -> Result<IdentityResult, AccountError> {
        self.create_user(user).await
    }

    async fn create_user(&self, user: &mut User) -> Result<IdentityResult, AccountError> {
        if self.store.find_by_name(&user.user_name).await?.is_some() {
            tracing::info!("User name already taken");
            return Ok(IdentityResult::failed(format!(
                "Name {} is already taken.",
                user.user_name
            )));
        }

        self.rotate_security_stamp(user).await?;
        if self.policy.lockout_enabled_by_default {
            user.lockout_enabled = true;
        }
        self.store.create(user).await?;

        tracing::info!("Registered user");
        Ok(IdentityResult::Succeeded)
    }

    /// Replace the password of a user without checking the old one
    #[tracing::instrument(skip(self, new_password), fields(user_id = %user_id))]
    pub async fn reset_password(&self, user_id: &str, new_password: &str) -> Result<(), AccountError> {
        let mut user = self.require_user(user_id).await?;

        let password_hash = self.hasher.hash_password(new_password)?;
        self.store
            .set_password_hash(&mut user, Some(password_hash))
            .await?;
        self.rotate_security_stamp(&mut user).await?;
        self.store.update(&user).await?;

        tracing::info!("Password reset");
        Ok(())
    }

    #[tracing::instrument(skip(self, current_password, new_password), fields(user_id = %user_id))]
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<IdentityResult, AccountError> {
        let mut user = self.require_user(user_id).await?;

        let stored_hash = self.store.get_password_hash(&user).await?;
        let matches = stored_hash
            .as_deref()
            .is_some_and(|hash| self.hasher.verify_password(current_password, hash));
        if !matches {
            tracing::info!("Current password did not match");
            return Ok(IdentityResult::failed("Incorrect password."));
        }

        if let Some(rejected) = self.validate_password(new_password) {
            return Ok(rejected);
        }

        let password_hash = self.hasher.hash_password(new_password)?;
        self.store
            .set_password_hash(&mut user, Some(password_hash))
            .await?;
        self.rotate_security_stamp(&mut user).await?;
        self.store.update(&user).await?;

        tracing::info!("Password changed");
        Ok(IdentityResult::Succeeded)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, provider = %login.login_provider))]
    pub async fn add_login(
        &self,
        user_id: &str,
        login: &UserLoginInfo,
    ) -> Result<IdentityResult, AccountError> {
        let user = self.require_user(user_id).await?;

        if self.store.find_by_login(login).await?.is_some() {
            return Ok(IdentityResult::failed(
                "A user with that external login already exists.",
            ));
        }

        self.store.add_login(&user, login).await?;
        Ok(IdentityResult::Succeeded)
    }

    /// The user with this name, if the password matches
    #[tracing::instrument(skip(self, password), fields(user_name = %user_name))]
    pub async fn find_user(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<Option<User>, AccountError> {
        let Some(user) = self.store.find_by_name(user_name).await? else {
            return Ok(None);
        };

        let verified = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| self.hasher.verify_password(password, hash));
        if verified {
            Ok(Some(user))
        } else {
            tracing::info!("Password verification failed");
            Ok(None)
        }
    }

    pub async fn find_user_by_id(&self, user_id: &str) -> Result<Option<User>, AccountError> {
        Ok(self.store.find_by_id(user_id).await?)
    }

    pub async fn find_user_by_login(
        &self,
        login: &UserLoginInfo,
    ) -> Result<Option<User>, AccountError> {
        Ok(self.store.find_by_login(login).await?)
    }

    /// Looks the address up as a user name: accounts registered with their email
    /// address as user name are found this way.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        Ok(self.store.find_by_name(email).await?)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn is_locked_out(&self, user_id: &str) -> Result<bool, AccountError> {
        let user = self.require_user(user_id).await?;
        Ok(user.is_locked_out_at(Utc::now()))
    }

    /// Record a failed sign-in; locks the user out once the policy threshold is reached
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn access_failed(&self, user_id: &str) -> Result<(), AccountError> {
        let mut user = self.require_user(user_id).await?;

        let count = self.store.increment_access_failed_count(&mut user).await?;
        if user.lockout_enabled && count >= self.policy.max_failed_access_attempts {
            let lockout_end = Utc::now() + self.policy.default_lockout_timespan;
            self.store
                .set_lockout_end_utc(&mut user, lockout_end)
                .await?;
            self.store.reset_access_failed_count(&mut user).await?;
            tracing::warn!(%lockout_end, "User locked out after repeated failures");
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn reset_access_failed_count(&self, user_id: &str) -> Result<(), AccountError> {
        let mut user = self.require_user(user_id).await?;
        self.store.reset_access_failed_count(&mut user).await?;
        Ok(())
    }

    pub async fn get_access_failed_count(&self, user_id: &str) -> Result<u32, AccountError> {
        let user = self.require_user(user_id).await?;
        Ok(self.store.get_access_failed_count(&user).await?)
    }

    pub async fn get_lockout_enabled(&self, user_id: &str) -> Result<bool, AccountError> {
        let user = self.require_user(user_id).await?;
        Ok(self.store.get_lockout_enabled(&user).await?)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, role = %role_name))]
    pub async fn add_user_to_role(
        &self,
        user_id: &str,
        role_name: &str,
    ) -> Result<IdentityResult, AccountError> {
        let user = self.require_user(user_id).await?;

        if self.store.is_in_role(&user, role_name).await? {
            return Ok(IdentityResult::failed("User already in role."));
        }

        self.store.add_to_role(&user, role_name).await?;
        Ok(IdentityResult::Succeeded)
    }

    /// Remove every role of the user. Fails as soon as the user has any role,
    /// since the store cannot remove role links.
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn remove_user_roles(&self, user_id: &str) -> Result<(), AccountError> {
        let user = self.require_user(user_id).await?;
        for role_name in self.store.get_roles(&user).await? {
            self.store.remove_from_role(&user, &role_name).await?;
        }
        Ok(())
    }

    async fn require_user(&self, user_id: &str) -> Result<User, AccountError> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AccountError::new(USER_NOT_FOUND).log())
    }

    async fn rotate_security_stamp(&self, user: &mut User) -> Result<(), AccountError> {
        self.store
            .set_security_stamp(user, uuid::Uuid::new_v4().to_string())
            .await?;
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Option<IdentityResult> {
        let required = self.policy.required_password_length;
        if password.chars().count() < required {
            return Some(IdentityResult::failed(format!(
                "Passwords must be at least {required} characters."
            )));
        }
        None
    }
}
