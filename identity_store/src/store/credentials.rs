use async_trait::async_trait;

use crate::errors::IdentityError;
use crate::types::User;

use super::{IdentityStore, require_user};

/// Password hash access.
///
/// `set_password_hash` only changes the in-memory user; call
/// [`UserStore::update`](super::UserStore::update) to persist it. The getters read
/// the stored row, so they reflect the last persisted value.
#[async_trait]
pub trait PasswordStore: Send + Sync + 'static {
    async fn set_password_hash(
        &self,
        user: &mut User,
        password_hash: Option<String>,
    ) -> Result<(), IdentityError>;
    async fn get_password_hash(&self, user: &User) -> Result<Option<String>, IdentityError>;
    /// True iff a non-empty hash is stored
    async fn has_password(&self, user: &User) -> Result<bool, IdentityError>;
}

/// Security stamp access; both operations work on the in-memory user only
#[async_trait]
pub trait SecurityStampStore: Send + Sync + 'static {
    async fn set_security_stamp(&self, user: &mut User, stamp: String)
    -> Result<(), IdentityError>;
    async fn get_security_stamp(&self, user: &User) -> Result<Option<String>, IdentityError>;
}

#[async_trait]
impl PasswordStore for IdentityStore {
    async fn set_password_hash(
        &self,
        user: &mut User,
        password_hash: Option<String>,
    ) -> Result<(), IdentityError> {
        require_user(user)?;
        user.password_hash = password_hash;
        Ok(())
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn get_password_hash(&self, user: &User) -> Result<Option<String>, IdentityError> {
        require_user(user)?;
        self.users.get_password_hash(&user.id).await
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn has_password(&self, user: &User) -> Result<bool, IdentityError> {
        require_user(user)?;
        Ok(self.users.get_password_hash(&user.id).await?.is_some())
    }
}

#[async_trait]
impl SecurityStampStore for IdentityStore {
    async fn set_security_stamp(
        &self,
        user: &mut User,
        stamp: String,
    ) -> Result<(), IdentityError> {
        require_user(user)?;
        user.security_stamp = Some(stamp);
        Ok(())
    }

    async fn get_security_stamp(&self, user: &User) -> Result<Option<String>, IdentityError> {
        require_user(user)?;
        Ok(user.security_stamp.clone())
    }
}
