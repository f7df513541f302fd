use async_trait::async_trait;

use crate::errors::{IdentityError, require_non_empty};
use crate::types::User;

use super::{IdentityStore, require_user};

/// Email address and its confirmation flag. Setters persist the whole user row.
#[async_trait]
pub trait EmailStore: Send + Sync + 'static {
    async fn set_email(&self, user: &mut User, email: Option<String>) -> Result<(), IdentityError>;
    async fn get_email(&self, user: &User) -> Result<Option<String>, IdentityError>;
    async fn get_email_confirmed(&self, user: &User) -> Result<bool, IdentityError>;
    async fn set_email_confirmed(&self, user: &mut User, confirmed: bool)
    -> Result<(), IdentityError>;
    /// Email lookup is not backed by a query and never finds a user
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError>;
}

/// Phone number and its confirmation flag. Setters persist the whole user row.
#[async_trait]
pub trait PhoneNumberStore: Send + Sync + 'static {
    async fn set_phone_number(
        &self,
        user: &mut User,
        phone_number: Option<String>,
    ) -> Result<(), IdentityError>;
    async fn get_phone_number(&self, user: &User) -> Result<Option<String>, IdentityError>;
    async fn get_phone_number_confirmed(&self, user: &User) -> Result<bool, IdentityError>;
    async fn set_phone_number_confirmed(
        &self,
        user: &mut User,
        confirmed: bool,
    ) -> Result<(), IdentityError>;
}

#[async_trait]
pub trait TwoFactorStore: Send + Sync + 'static {
    /// Persists the whole user row
    async fn set_two_factor_enabled(
        &self,
        user: &mut User,
        enabled: bool,
    ) -> Result<(), IdentityError>;
    async fn get_two_factor_enabled(&self, user: &User) -> Result<bool, IdentityError>;
}

#[async_trait]
impl EmailStore for IdentityStore {
    #[tracing::instrument(skip(self, user, email), fields(user_id = %user.id))]
    async fn set_email(&self, user: &mut User, email: Option<String>) -> Result<(), IdentityError> {
        self.update_with(user, move |user| user.email = email)
            .await
    }

    async fn get_email(&self, user: &User) -> Result<Option<String>, IdentityError> {
        require_user(user)?;
        Ok(user.email.clone())
    }

    async fn get_email_confirmed(&self, user: &User) -> Result<bool, IdentityError> {
        require_user(user)?;
        Ok(user.email_confirmed)
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn set_email_confirmed(
        &self,
        user: &mut User,
        confirmed: bool,
    ) -> Result<(), IdentityError> {
        self.update_with(user, move |user| user.email_confirmed = confirmed)
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        require_non_empty(email, "email")?;
        self.users.get_by_email(email).await
    }
}

#[async_trait]
impl PhoneNumberStore for IdentityStore {
    #[tracing::instrument(skip(self, user, phone_number), fields(user_id = %user.id))]
    async fn set_phone_number(
        &self,
        user: &mut User,
        phone_number: Option<String>,
    ) -> Result<(), IdentityError> {
        self.update_with(user, move |user| user.phone_number = phone_number)
            .await
    }

    async fn get_phone_number(&self, user: &User) -> Result<Option<String>, IdentityError> {
        require_user(user)?;
        Ok(user.phone_number.clone())
    }

    async fn get_phone_number_confirmed(&self, user: &User) -> Result<bool, IdentityError> {
        require_user(user)?;
        Ok(user.phone_number_confirmed)
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn set_phone_number_confirmed(
        &self,
        user: &mut User,
        confirmed: bool,
    ) -> Result<(), IdentityError> {
        self.update_with(user, move |user| user.phone_number_confirmed = confirmed)
            .await
    }
}

#[async_trait]
impl TwoFactorStore for IdentityStore {
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn set_two_factor_enabled(
        &self,
        user: &mut User,
        enabled: bool,
    ) -> Result<(), IdentityError> {
        self.update_with(user, move |user| user.two_factor_enabled = enabled)
            .await
    }

    async fn get_two_factor_enabled(&self, user: &User) -> Result<bool, IdentityError> {
        require_user(user)?;
        Ok(user.two_factor_enabled)
    }
}
