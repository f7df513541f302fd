use async_trait::async_trait;

use crate::errors::{IdentityError, require_non_empty};
use crate::types::{Role, User};

use super::{IdentityStore, require_user};

/// Role membership of users. Role names match case-sensitively.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// Link the user to the named role; an unknown role name is ignored
    async fn add_to_role(&self, user: &User, role_name: &str) -> Result<(), IdentityError>;
    /// Always fails with [`IdentityError::NotImplemented`]
    async fn remove_from_role(&self, user: &User, role_name: &str) -> Result<(), IdentityError>;
    async fn get_roles(&self, user: &User) -> Result<Vec<String>, IdentityError>;
    async fn is_in_role(&self, user: &User, role_name: &str) -> Result<bool, IdentityError>;
}

/// Maintenance of the role catalogue itself
#[async_trait]
pub trait RoleAdminStore: Send + Sync + 'static {
    async fn create_role(&self, role: &Role) -> Result<(), IdentityError>;
    /// Rename the role with the same id
    async fn update_role(&self, role: &Role) -> Result<(), IdentityError>;
    async fn delete_role(&self, role: &Role) -> Result<(), IdentityError>;
    async fn find_role_by_id(&self, role_id: &str) -> Result<Option<Role>, IdentityError>;
    async fn find_role_by_name(&self, role_name: &str) -> Result<Option<Role>, IdentityError>;
}

#[async_trait]
impl RoleStore for IdentityStore {
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id, role = %role_name))]
    async fn add_to_role(&self, user: &User, role_name: &str) -> Result<(), IdentityError> {
        require_user(user)?;
        require_non_empty(role_name, "roleName")?;

        match self.roles.get_id_by_name(role_name).await? {
            Some(role_id) => {
                self.user_roles.insert(&user.id, &role_id).await?;
                tracing::info!("Added user to role");
            }
            None => tracing::debug!("Role does not exist, nothing to add"),
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id, role = %role_name))]
    async fn remove_from_role(&self, user: &User, role_name: &str) -> Result<(), IdentityError> {
        Err(IdentityError::NotImplemented(
            "remove_from_role is not supported".to_string(),
        ))
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn get_roles(&self, user: &User) -> Result<Vec<String>, IdentityError> {
        require_user(user)?;
        self.user_roles.find_role_names_by_user_id(&user.id).await
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id, role = %role_name))]
    async fn is_in_role(&self, user: &User, role_name: &str) -> Result<bool, IdentityError> {
        require_user(user)?;
        require_non_empty(role_name, "role")?;

        let roles = self.user_roles.find_role_names_by_user_id(&user.id).await?;
        Ok(roles.iter().any(|name| name == role_name))
    }
}

fn require_role(role: &Role) -> Result<(), IdentityError> {
    require_non_empty(&role.id, "role")?;
    require_non_empty(&role.name, "role")
}

#[async_trait]
impl RoleAdminStore for IdentityStore {
    #[tracing::instrument(skip(self), fields(role_id = %role.id))]
    async fn create_role(&self, role: &Role) -> Result<(), IdentityError> {
        require_role(role)?;
        self.roles.insert(role).await?;
        tracing::info!(role = %role.name, "Created role");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(role_id = %role.id))]
    async fn update_role(&self, role: &Role) -> Result<(), IdentityError> {
        require_role(role)?;
        self.roles.update(role).await?;
        Ok(())
    }

    /// Deletes the role row only; existing user links are left behind and ignored by lookups
    #[tracing::instrument(skip(self), fields(role_id = %role.id))]
    async fn delete_role(&self, role: &Role) -> Result<(), IdentityError> {
        require_non_empty(&role.id, "role")?;
        self.roles.delete(&role.id).await?;
        Ok(())
    }

    async fn find_role_by_id(&self, role_id: &str) -> Result<Option<Role>, IdentityError> {
        require_non_empty(role_id, "roleId")?;
        self.roles.get_by_id(role_id).await
    }

    async fn find_role_by_name(&self, role_name: &str) -> Result<Option<Role>, IdentityError> {
        require_non_empty(role_name, "roleName")?;
        self.roles.get_by_name(role_name).await
    }
}
