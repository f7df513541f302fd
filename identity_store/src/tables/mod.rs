//! One gateway per identity table, each issuing parameterized statements through [`Database`](crate::Database).

mod role_table;
mod user_claims_table;
mod user_logins_table;
mod user_roles_table;
mod user_table;

pub use role_table::RoleTable;
pub use user_claims_table::UserClaimsTable;
pub use user_logins_table::UserLoginsTable;
pub use user_roles_table::UserRolesTable;
pub use user_table::UserTable;
