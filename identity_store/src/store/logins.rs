use async_trait::async_trait;

use crate::errors::{IdentityError, require_non_empty};
use crate::types::{User, UserLoginInfo};

use super::{IdentityStore, require_user};

/// External provider logins linked to users
#[async_trait]
pub trait LoginStore: Send + Sync + 'static {
    async fn add_login(&self, user: &User, login: &UserLoginInfo) -> Result<(), IdentityError>;
    async fn remove_login(&self, user: &User, login: &UserLoginInfo)
    -> Result<(), IdentityError>;
    async fn get_logins(&self, user: &User) -> Result<Vec<UserLoginInfo>, IdentityError>;
    /// Resolve the owner of a provider/key pair
    async fn find_by_login(&self, login: &UserLoginInfo) -> Result<Option<User>, IdentityError>;
}

fn require_login(login: &UserLoginInfo) -> Result<(), IdentityError> {
    require_non_empty(&login.login_provider, "login")?;
    require_non_empty(&login.provider_key, "login")
}

#[async_trait]
impl LoginStore for IdentityStore {
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id, provider = %login.login_provider))]
    async fn add_login(&self, user: &User, login: &UserLoginInfo) -> Result<(), IdentityError> {
        require_user(user)?;
        require_login(login)?;

        self.user_logins.insert(&user.id, login).await?;
        tracing::info!("Linked external login");
        Ok(())
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id, provider = %login.login_provider))]
    async fn remove_login(
        &self,
        user: &User,
        login: &UserLoginInfo,
    ) -> Result<(), IdentityError> {
        require_user(user)?;
        require_login(login)?;

        self.user_logins.delete_login(&user.id, login).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn get_logins(&self, user: &User) -> Result<Vec<UserLoginInfo>, IdentityError> {
        require_user(user)?;
        self.user_logins.find_by_user_id(&user.id).await
    }

    #[tracing::instrument(skip(self), fields(provider = %login.login_provider))]
    async fn find_by_login(&self, login: &UserLoginInfo) -> Result<Option<User>, IdentityError> {
        require_login(login)?;

        match self.user_logins.find_user_id_by_login(login).await? {
            Some(user_id) => self.users.get_by_id(&user_id).await,
            None => {
                tracing::info!(found = false, "No user linked to login");
                Ok(None)
            }
        }
    }
}
