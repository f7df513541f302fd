use async_trait::async_trait;

use crate::errors::{IdentityError, require_non_empty};
use crate::types::{Claim, User};

use super::{IdentityStore, require_user};

#[async_trait]
pub trait ClaimStore: Send + Sync + 'static {
    async fn get_claims(&self, user: &User) -> Result<Vec<Claim>, IdentityError>;
    async fn add_claim(&self, user: &User, claim: &Claim) -> Result<(), IdentityError>;
    /// Removes every stored row with the same type and value
    async fn remove_claim(&self, user: &User, claim: &Claim) -> Result<(), IdentityError>;
}

#[async_trait]
impl ClaimStore for IdentityStore {
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn get_claims(&self, user: &User) -> Result<Vec<Claim>, IdentityError> {
        require_user(user)?;
        self.user_claims.find_by_user_id(&user.id).await
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id, claim_type = %claim.claim_type))]
    async fn add_claim(&self, user: &User, claim: &Claim) -> Result<(), IdentityError> {
        require_user(user)?;
        require_non_empty(&claim.claim_type, "claim")?;

        self.user_claims.insert(claim, &user.id).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id, claim_type = %claim.claim_type))]
    async fn remove_claim(&self, user: &User, claim: &Claim) -> Result<(), IdentityError> {
        require_user(user)?;
        require_non_empty(&claim.claim_type, "claim")?;

        let removed = self.user_claims.delete_claim(&user.id, claim).await?;
        tracing::debug!(removed, "Removed claim rows");
        Ok(())
    }
}
