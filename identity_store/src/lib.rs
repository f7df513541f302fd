//! identity-store - Relational user-identity storage
//!
//! This crate stores users, password hashes, roles, claims, external logins and
//! lockout state in a relational database (SQLite or PostgreSQL through sqlx).
//!
//! Layers, bottom up:
//! - [`Database`]: parameterized statements with `@name` placeholders, pooled
//!   connections acquired per operation with bounded retry
//! - [`tables`]: one gateway per table
//! - [`IdentityStore`]: capability traits ([`UserStore`], [`PasswordStore`],
//!   [`RoleStore`], [`LockoutStore`], ...) over a [`User`]
//! - [`AccountService`]: registration, password and lockout workflows

mod account;
mod config;
mod errors;
mod storage;
mod store;
pub mod tables;
mod types;

#[cfg(test)]
mod test_utils;

pub use account::{
    AccountError, AccountService, IdentityResult, LockoutPolicy, PasswordHasher,
    Pbkdf2PasswordHasher,
};

pub use config::{
    ConnectionStringProvider, DB_CONNECT_MAX_ATTEMPTS, DB_CONNECT_RETRY_DELAY, DB_MAX_CONNECTIONS,
    DEFAULT_CONNECTION_NAME, EnvConnectionStrings,
};

pub use errors::IdentityError;

pub use storage::{Database, DbRow, FromDbRow, Params, SqlValue};

pub use store::{
    ClaimStore, EmailStore, IdentityStore, LockoutStore, LoginStore, PasswordStore,
    PhoneNumberStore, RoleAdminStore, RoleStore, SecurityStampStore, TwoFactorStore, UserStore,
};

pub use types::{Claim, Role, User, UserLoginInfo};
