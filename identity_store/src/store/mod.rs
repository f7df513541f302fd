//! Capability-segmented identity store.
//!
//! [`IdentityStore`] composes the five table gateways and implements one trait per
//! capability group, so callers can depend on just the capabilities they use.
//! Getters of in-memory state read the [`User`] passed in; setters marked as
//! persisting write the full row back through [`UserStore::update`] semantics,
//! and leave the passed-in [`User`] untouched when that write fails.

mod claims;
mod credentials;
mod lockout;
mod logins;
mod roles;
mod users;
mod verification;

pub use claims::ClaimStore;
pub use credentials::{PasswordStore, SecurityStampStore};
pub use lockout::LockoutStore;
pub use logins::LoginStore;
pub use roles::{RoleAdminStore, RoleStore};
pub use users::UserStore;
pub use verification::{EmailStore, PhoneNumberStore, TwoFactorStore};

use crate::config::ConnectionStringProvider;
use crate::errors::{IdentityError, require_non_empty};
use crate::storage::Database;
use crate::tables::{RoleTable, UserClaimsTable, UserLoginsTable, UserRolesTable, UserTable};
use crate::types::User;

/// Relational implementation of every identity capability
#[derive(Clone, Debug)]
pub struct IdentityStore {
    database: Database,
    users: UserTable,
    roles: RoleTable,
    user_roles: UserRolesTable,
    user_claims: UserClaimsTable,
    user_logins: UserLoginsTable,
}

impl IdentityStore {
    pub fn new(database: Database) -> Self {
        Self {
            users: UserTable::new(database.clone()),
            roles: RoleTable::new(database.clone()),
            user_roles: UserRolesTable::new(database.clone()),
            user_claims: UserClaimsTable::new(database.clone()),
            user_logins: UserLoginsTable::new(database.clone()),
            database,
        }
    }

    /// Build a store over the named connection string
    pub fn from_config(
        provider: &dyn ConnectionStringProvider,
        name: &str,
    ) -> Result<Self, IdentityError> {
        Ok(Self::new(Database::from_config(provider, name)?))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Create the identity tables when they do not exist yet
    pub async fn init(&self) -> Result<(), IdentityError> {
        self.database.init_schema().await
    }

    /// Writes the row with `change` applied. `user` takes the new values only
    /// once the write has succeeded.
    pub(crate) async fn update_with<F>(&self, user: &mut User, change: F) -> Result<(), IdentityError>
    where
        F: FnOnce(&mut User) + Send,
    {
        require_user(user)?;
        let mut updated = user.clone();
        change(&mut updated);
        self.users.update(&updated).await?;
        *user = updated;
        Ok(())
    }
}

/// A user with an empty id stands for "no user".
pub(crate) fn require_user(user: &User) -> Result<(), IdentityError> {
    require_non_empty(&user.id, "user")
}
