use chrono::Utc;

use crate::errors::IdentityError;
use crate::storage::{
    Database, DbRow, FromDbRow, Params, SqlValue, format_timestamp, non_empty, parse_flag,
    parse_timestamp,
};
use crate::types::User;

impl FromDbRow for User {
    const COLUMNS: &'static [&'static str] = &[
        "Id",
        "UserName",
        "PasswordHash",
        "SecurityStamp",
        "Email",
        "EmailConfirmed",
        "PhoneNumber",
        "PhoneNumberConfirmed",
        "AccessFailedCount",
        "LockoutEnabled",
        "LockoutEndDateUtc",
        "TwoFactorEnabled",
    ];

    fn from_db_row(row: &DbRow) -> Result<Self, IdentityError> {
        let id = row
            .required("Id")?
            .ok_or_else(|| IdentityError::Storage("User row has a NULL Id".to_string()))?
            .to_string();

        // An empty lockout end means "not locked": the current instant is used as a placeholder.
        let lockout_end_utc = match non_empty(row.required("LockoutEndDateUtc")?) {
            Some(text) => parse_timestamp(&text)?,
            None => Utc::now(),
        };

        let access_failed_count = match non_empty(row.required("AccessFailedCount")?) {
            Some(text) => text.trim().parse::<u32>().map_err(|e| {
                IdentityError::Storage(format!("Invalid AccessFailedCount '{text}': {e}"))
            })?,
            None => 0,
        };

        Ok(User {
            id,
            user_name: row.required("UserName")?.unwrap_or_default().to_string(),
            email: non_empty(row.required("Email")?),
            email_confirmed: parse_flag(row.required("EmailConfirmed")?),
            password_hash: non_empty(row.required("PasswordHash")?),
            security_stamp: non_empty(row.required("SecurityStamp")?),
            phone_number: non_empty(row.required("PhoneNumber")?),
            phone_number_confirmed: parse_flag(row.required("PhoneNumberConfirmed")?),
            two_factor_enabled: parse_flag(row.required("TwoFactorEnabled")?),
            lockout_enabled: parse_flag(row.required("LockoutEnabled")?),
            lockout_end_utc,
            access_failed_count,
        })
    }
}

/// Gateway for the `Users` table
#[derive(Clone, Debug)]
pub struct UserTable {
    database: Database,
}

impl UserTable {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    // All twelve columns, shared by insert and update
    fn row_params(user: &User) -> Result<Params, IdentityError> {
        let params = Params::new()
            .with("@id", &user.id)
            .with("@name", &user.user_name)
            .with("@pswHash", user.password_hash.clone())
            .with("@secStamp", user.security_stamp.clone())
            .with("@email", user.email.clone())
            .with("@emailconfirmed", user.email_confirmed)
            .with("@phonenumber", user.phone_number.clone())
            .with("@phonenumberconfirmed", user.phone_number_confirmed)
            .with("@accesscount", SqlValue::try_from(user.access_failed_count)?)
            .with("@lockoutenabled", user.lockout_enabled)
            .with("@lockoutenddate", format_timestamp(&user.lockout_end_utc))
            .with("@twofactorenabled", user.two_factor_enabled);
        Ok(params)
    }

    pub async fn insert(&self, user: &User) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "INSERT INTO Users (Id, UserName, PasswordHash, SecurityStamp, Email, \
                 EmailConfirmed, PhoneNumber, PhoneNumberConfirmed, AccessFailedCount, \
                 LockoutEnabled, LockoutEndDateUtc, TwoFactorEnabled) \
                 VALUES (@id, @name, @pswHash, @secStamp, @email, @emailconfirmed, \
                 @phonenumber, @phonenumberconfirmed, @accesscount, @lockoutenabled, \
                 @lockoutenddate, @twofactorenabled)",
                &Self::row_params(user)?,
            )
            .await
    }

    /// Replace every column of the row with the same id
    pub async fn update(&self, user: &User) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "UPDATE Users SET UserName = @name, PasswordHash = @pswHash, \
                 SecurityStamp = @secStamp, Email = @email, EmailConfirmed = @emailconfirmed, \
                 PhoneNumber = @phonenumber, PhoneNumberConfirmed = @phonenumberconfirmed, \
                 AccessFailedCount = @accesscount, LockoutEnabled = @lockoutenabled, \
                 LockoutEndDateUtc = @lockoutenddate, TwoFactorEnabled = @twofactorenabled \
                 WHERE Id = @id",
                &Self::row_params(user)?,
            )
            .await
    }

    pub async fn delete(&self, user_id: &str) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "DELETE FROM Users WHERE Id = @userId",
                &Params::new().with("@userId", user_id),
            )
            .await
    }

    /// Returns the user only when exactly one row carries this id
    pub async fn get_by_id(&self, user_id: &str) -> Result<Option<User>, IdentityError> {
        let mut users: Vec<User> = self
            .database
            .query_as(
                &format!("SELECT {} FROM Users WHERE Id = @id", User::select_list()),
                &Params::new().with("@id", user_id),
            )
            .await?;

        if users.len() == 1 {
            Ok(users.pop())
        } else {
            Ok(None)
        }
    }

    pub async fn get_by_name(&self, user_name: &str) -> Result<Vec<User>, IdentityError> {
        self.database
            .query_as(
                &format!(
                    "SELECT {} FROM Users WHERE UserName = @name",
                    User::select_list()
                ),
                &Params::new().with("@name", user_name),
            )
            .await
    }

    /// Email lookup has no backing query; always reports no match.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, IdentityError> {
        tracing::warn!(email = %email, "Lookup of users by email is not supported");
        Ok(None)
    }

    pub async fn get_user_name(&self, user_id: &str) -> Result<Option<String>, IdentityError> {
        self.database
            .query_scalar(
                "SELECT UserName FROM Users WHERE Id = @id",
                &Params::new().with("@id", user_id),
            )
            .await
    }

    pub async fn get_user_id(&self, user_name: &str) -> Result<Option<String>, IdentityError> {
        self.database
            .query_scalar(
                "SELECT Id FROM Users WHERE UserName = @name",
                &Params::new().with("@name", user_name),
            )
            .await
    }

    /// Stored password hash; an empty value counts as absent
    pub async fn get_password_hash(&self, user_id: &str) -> Result<Option<String>, IdentityError> {
        let hash = self
            .database
            .query_scalar(
                "SELECT PasswordHash FROM Users WHERE Id = @id",
                &Params::new().with("@id", user_id),
            )
            .await?;
        Ok(non_empty(hash.as_deref()))
    }

    pub async fn set_password_hash(
        &self,
        user_id: &str,
        password_hash: Option<&str>,
    ) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "UPDATE Users SET PasswordHash = @pwdHash WHERE Id = @id",
                &Params::new()
                    .with("@pwdHash", password_hash)
                    .with("@id", user_id),
            )
            .await
    }

    pub async fn get_security_stamp(&self, user_id: &str) -> Result<Option<String>, IdentityError> {
        let stamp = self
            .database
            .query_scalar(
                "SELECT SecurityStamp FROM Users WHERE Id = @id",
                &Params::new().with("@id", user_id),
            )
            .await?;
        Ok(non_empty(stamp.as_deref()))
    }
}
