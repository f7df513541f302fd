//! Table definitions for the identity store.
//!
//! The DDL sticks to types and clauses understood by both SQLite and PostgreSQL.
//! Identifiers are left unquoted, so PostgreSQL reports column names in lower
//! case; row lookups ignore case for that reason.

pub(crate) const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS Users (
        Id VARCHAR(128) NOT NULL PRIMARY KEY,
        UserName VARCHAR(256) NOT NULL,
        PasswordHash TEXT NULL,
        SecurityStamp TEXT NULL,
        Email VARCHAR(256) NULL,
        EmailConfirmed INTEGER NOT NULL DEFAULT 0,
        PhoneNumber VARCHAR(64) NULL,
        PhoneNumberConfirmed INTEGER NOT NULL DEFAULT 0,
        AccessFailedCount INTEGER NOT NULL DEFAULT 0,
        LockoutEnabled INTEGER NOT NULL DEFAULT 0,
        LockoutEndDateUtc VARCHAR(64) NULL,
        TwoFactorEnabled INTEGER NOT NULL DEFAULT 0
    )
"#;

pub(crate) const CREATE_ROLES: &str = r#"
    CREATE TABLE IF NOT EXISTS Roles (
        Id VARCHAR(128) NOT NULL PRIMARY KEY,
        Name VARCHAR(256) NOT NULL
    )
"#;

// Link tables carry no keys or foreign-key constraints; duplicates are tolerated.
pub(crate) const CREATE_USER_ROLES: &str = r#"
    CREATE TABLE IF NOT EXISTS UserRoles (
        UserId VARCHAR(128) NOT NULL,
        RoleId VARCHAR(128) NOT NULL
    )
"#;

pub(crate) const CREATE_USER_CLAIMS: &str = r#"
    CREATE TABLE IF NOT EXISTS UserClaims (
        UserId VARCHAR(128) NOT NULL,
        ClaimType TEXT NOT NULL,
        ClaimValue TEXT NULL
    )
"#;

pub(crate) const CREATE_USER_LOGINS: &str = r#"
    CREATE TABLE IF NOT EXISTS UserLogins (
        UserId VARCHAR(128) NOT NULL,
        LoginProvider VARCHAR(128) NOT NULL,
        ProviderKey VARCHAR(256) NOT NULL
    )
"#;

pub(crate) const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_USERS,
    CREATE_ROLES,
    CREATE_USER_ROLES,
    CREATE_USER_CLAIMS,
    CREATE_USER_LOGINS,
    "CREATE INDEX IF NOT EXISTS IX_Users_UserName ON Users (UserName)",
    "CREATE INDEX IF NOT EXISTS IX_UserRoles_UserId ON UserRoles (UserId)",
    "CREATE INDEX IF NOT EXISTS IX_UserClaims_UserId ON UserClaims (UserId)",
    "CREATE INDEX IF NOT EXISTS IX_UserLogins_UserId ON UserLogins (UserId)",
    "CREATE INDEX IF NOT EXISTS IX_UserLogins_Provider ON UserLogins (LoginProvider, ProviderKey)",
];
