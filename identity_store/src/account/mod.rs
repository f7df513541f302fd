//! Registration, password and lockout workflows on top of the identity store

mod errors;
mod hasher;
mod service;
mod types;

pub use errors::AccountError;
pub use hasher::{PasswordHasher, Pbkdf2PasswordHasher};
pub use service::AccountService;
pub use types::{IdentityResult, LockoutPolicy};
