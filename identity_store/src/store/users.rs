use async_trait::async_trait;

use crate::errors::{IdentityError, require_non_empty};
use crate::types::User;

use super::{IdentityStore, require_user};

/// Create, find, update and delete users
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn create(&self, user: &User) -> Result<(), IdentityError>;
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, IdentityError>;
    /// Returns a user only when the name matches exactly one row
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, IdentityError>;
    async fn update(&self, user: &User) -> Result<(), IdentityError>;
    /// Removes the user together with their logins, claims and role links
    async fn delete(&self, user: &User) -> Result<(), IdentityError>;
}

#[async_trait]
impl UserStore for IdentityStore {
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: &User) -> Result<(), IdentityError> {
        require_user(user)?;
        require_non_empty(&user.user_name, "user")?;

        self.users.insert(user).await?;
        tracing::info!(user_name = %user.user_name, "Created user");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, IdentityError> {
        require_non_empty(user_id, "userId")?;

        let user = self.users.get_by_id(user_id).await?;
        tracing::info!(found = user.is_some(), "User lookup by id completed");
        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(user_name = %user_name))]
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, IdentityError> {
        require_non_empty(user_name, "userName")?;

        let mut users = self.users.get_by_name(user_name).await?;
        match users.len() {
            1 => Ok(users.pop()),
            0 => {
                tracing::info!(found = false, "User lookup by name completed");
                Ok(None)
            }
            n => {
                tracing::warn!(matches = n, "User name is not unique, treating as not found");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> Result<(), IdentityError> {
        require_user(user)?;

        let affected = self.users.update(user).await?;
        tracing::debug!(affected, "Updated user row");
        Ok(())
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn delete(&self, user: &User) -> Result<(), IdentityError> {
        require_user(user)?;

        // Sequential, not atomic: a failure part-way leaves the earlier deletions in place.
        self.user_logins.delete(&user.id).await?;
        self.user_claims.delete(&user.id).await?;
        self.user_roles.delete(&user.id).await?;
        self.users.delete(&user.id).await?;

        tracing::info!("Deleted user");
        Ok(())
    }
}
