use crate::errors::IdentityError;
use crate::storage::{Database, Params};
use crate::types::Role;

/// Gateway for the `Roles` table
#[derive(Clone, Debug)]
pub struct RoleTable {
    database: Database,
}

impl RoleTable {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub async fn insert(&self, role: &Role) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "INSERT INTO Roles (Id, Name) VALUES (@id, @name)",
                &Params::new().with("@id", &role.id).with("@name", &role.name),
            )
            .await
    }

    /// Rename the role with the same id
    pub async fn update(&self, role: &Role) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "UPDATE Roles SET Name = @name WHERE Id = @id",
                &Params::new().with("@name", &role.name).with("@id", &role.id),
            )
            .await
    }

    pub async fn delete(&self, role_id: &str) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "DELETE FROM Roles WHERE Id = @id",
                &Params::new().with("@id", role_id),
            )
            .await
    }

    pub async fn get_name_by_id(&self, role_id: &str) -> Result<Option<String>, IdentityError> {
        self.database
            .query_scalar(
                "SELECT Name FROM Roles WHERE Id = @id",
                &Params::new().with("@id", role_id),
            )
            .await
    }

    /// Role names compare case-sensitively
    pub async fn get_id_by_name(&self, role_name: &str) -> Result<Option<String>, IdentityError> {
        self.database
            .query_scalar(
                "SELECT Id FROM Roles WHERE Name = @name",
                &Params::new().with("@name", role_name),
            )
            .await
    }

    pub async fn get_by_id(&self, role_id: &str) -> Result<Option<Role>, IdentityError> {
        Ok(self
            .get_name_by_id(role_id)
            .await?
            .map(|name| Role::with_id(role_id, name)))
    }

    pub async fn get_by_name(&self, role_name: &str) -> Result<Option<Role>, IdentityError> {
        Ok(self
            .get_id_by_name(role_name)
            .await?
            .map(|id| Role::with_id(id, role_name)))
    }
}
