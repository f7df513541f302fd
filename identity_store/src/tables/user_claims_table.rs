use crate::errors::IdentityError;
use crate::storage::{Database, DbRow, FromDbRow, Params};
use crate::types::Claim;

impl FromDbRow for Claim {
    const COLUMNS: &'static [&'static str] = &["ClaimType", "ClaimValue"];

    fn from_db_row(row: &DbRow) -> Result<Self, IdentityError> {
        Ok(Claim {
            claim_type: row.required("ClaimType")?.unwrap_or_default().to_string(),
            claim_value: row.required("ClaimValue")?.unwrap_or_default().to_string(),
        })
    }
}

/// Gateway for the `UserClaims` table
#[derive(Clone, Debug)]
pub struct UserClaimsTable {
    database: Database,
}

impl UserClaimsTable {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<Claim>, IdentityError> {
        self.database
            .query_as(
                &format!(
                    "SELECT {} FROM UserClaims WHERE UserId = @userId",
                    Claim::select_list()
                ),
                &Params::new().with("@userId", user_id),
            )
            .await
    }

    /// Remove every claim of the user
    pub async fn delete(&self, user_id: &str) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "DELETE FROM UserClaims WHERE UserId = @userId",
                &Params::new().with("@userId", user_id),
            )
            .await
    }

    /// Remove the user's rows matching both claim type and value
    pub async fn delete_claim(&self, user_id: &str, claim: &Claim) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "DELETE FROM UserClaims WHERE UserId = @userId \
                 AND ClaimType = @type AND ClaimValue = @value",
                &Params::new()
                    .with("@userId", user_id)
                    .with("@type", &claim.claim_type)
                    .with("@value", &claim.claim_value),
            )
            .await
    }

    pub async fn insert(&self, claim: &Claim, user_id: &str) -> Result<u64, IdentityError> {
        self.database
            .execute(
                "INSERT INTO UserClaims (ClaimValue, ClaimType, UserId) \
                 VALUES (@value, @type, @userId)",
                &Params::new()
                    .with("@value", &claim.claim_value)
                    .with("@type", &claim.claim_type)
                    .with("@userId", user_id),
            )
            .await
    }
}
