use crate::errors::IdentityError;
use crate::storage::{Database, DbRow, FromDbRow, Params};
use crate::types::UserLoginInfo;

impl FromDbRow for UserLoginInfo {
    const COLUMNS: &'static [&'static str] = &["LoginProvider", "ProviderKey"];

    fn from_db_row(row: &DbRow) -> Result<Self, IdentityError> {
        Ok(UserLoginInfo {
            login_provider: row.required("LoginProvider")?.unwrap_or_default().to_string(),
            provider_key: row.required("ProviderKey")?.unwrap_or_default().to_string(),
        })
    }
}

/// Gateway for the `UserLogins` table
#[derive(Clone, Debug)]
pub struct UserLoginsTable {
    database: Database,
}

impl UserLoginsTable {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Id of the user owning this provider/key pair
    pub async fn find_user_id_by_login(
        &self,
        login: &UserLoginInfo,
    ) -> Result<Option<String>, IdentityError> {
        self.database
            .query_scalar(
                "SELECT UserId FROM UserLogins \
                 WHERE LoginProvider = @loginProvider AND ProviderKey = @providerKey",
                &Params::new()
                    .with("@loginProvider", &login.login_provider)
                    .with("@providerKey", &login.provider_key),
            )
            .await
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<UserLoginInfo>, IdentityError> {
        self.database
            .query_as(
                &format!(
                    "SELECT {} FROM UserLogins WHERE UserId = @userId",
                    UserLoginInfo::select_list()
                ),
                &Params::new().with("@userId", user_id),
            )
            .await
    }

    pub async fn insert(&self, user_id: &str, login: &UserLoginInfo) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "INSERT INTO UserLogins (LoginProvider, ProviderKey, UserId) \
                 VALUES (@loginProvider, @providerKey, @userId)",
                &Params::new()
                    .with("@loginProvider", &login.login_provider)
                    .with("@providerKey", &login.provider_key)
                    .with("@userId", user_id),
            )
            .await
    }

    pub async fn delete_login(
        &self,
        user_id: &str,
        login: &UserLoginInfo,
    ) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "DELETE FROM UserLogins WHERE UserId = @userId \
                 AND LoginProvider = @loginProvider AND ProviderKey = @providerKey",
                &Params::new()
                    .with("@userId", user_id)
                    .with("@loginProvider", &login.login_provider)
                    .with("@providerKey", &login.provider_key),
            )
            .await
    }

    /// Remove every login of the user
    pub async fn delete(&self, user_id: &str) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "DELETE FROM UserLogins WHERE UserId = @userId",
                &Params::new().with("@userId", user_id),
            )
            .await
    }
}
