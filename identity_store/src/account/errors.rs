use thiserror::Error;

use crate::errors::IdentityError;

/// Uniform failure reported by [`AccountService`](super::AccountService).
///
/// Carries the message of the underlying failure; when that failure came from the
/// identity store, the original [`IdentityError`] stays reachable through
/// [`std::error::Error::source`] and [`AccountError::identity_error`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AccountError {
    message: String,
    #[source]
    source: Option<IdentityError>,
}

impl AccountError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The store error this failure wraps, if any
    pub fn identity_error(&self) -> Option<&IdentityError> {
        self.source.as_ref()
    }

    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self.source {
            Some(source) => tracing::error!(source = ?source, "Account error: {}", self.message),
            None => tracing::error!("Account error: {}", self.message),
        }
        self
    }
}

impl From<IdentityError> for AccountError {
    fn from(err: IdentityError) -> Self {
        Self {
            message: err.to_string(),
            source: Some(err),
        }
        .log()
    }
}
