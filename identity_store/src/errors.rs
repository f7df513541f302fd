use thiserror::Error;

/// Errors raised by the storage gateway, the table gateways and the identity store.
///
/// A missing row is never an error: lookups return `Ok(None)` instead.
#[derive(Clone, Error, Debug, PartialEq)]
pub enum IdentityError {
    /// A required input (id, user name, claim, login, statement text) was empty or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation exists in the contract but has no implementation
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Any failure reported by the database layer, including undecodable rows
    #[error("Storage error: {0}")]
    Storage(String),

    /// The connection string could not be resolved or parsed
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        IdentityError::Storage(err.to_string())
    }
}

/// Reject empty or whitespace-only required arguments.
pub(crate) fn require_non_empty(value: &str, name: &str) -> Result<(), IdentityError> {
    if value.trim().is_empty() {
        return Err(IdentityError::InvalidArgument(format!(
            "Null or empty argument: {name}"
        )));
    }
    Ok(())
}
