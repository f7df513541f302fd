use crate::errors::IdentityError;
use crate::storage::{Database, Params};

/// Gateway for the `UserRoles` link table
#[derive(Clone, Debug)]
pub struct UserRolesTable {
    database: Database,
}

impl UserRolesTable {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Names of every role linked to the user; links to deleted roles are skipped
    pub async fn find_role_names_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<String>, IdentityError> {
        let rows = self
            .database
            .query(
                "SELECT Roles.Name AS Name FROM UserRoles, Roles \
                 WHERE UserRoles.UserId = @userId AND UserRoles.RoleId = Roles.Id",
                &Params::new().with("@userId", user_id),
            )
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get("Name").map(str::to_string))
            .collect())
    }

    /// Remove every role link of the user
    pub async fn delete(&self, user_id: &str) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "DELETE FROM UserRoles WHERE UserId = @userId",
                &Params::new().with("@userId", user_id),
            )
            .await
    }

    pub async fn insert(&self, user_id: &str, role_id: &str) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "INSERT INTO UserRoles (UserId, RoleId) VALUES (@userId, @roleId)",
                &Params::new()
                    .with("@userId", user_id)
                    .with("@roleId", role_id),
            )
            .await
    }
}
