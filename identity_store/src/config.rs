//! Connection-string lookup and connection tuning knobs

use std::collections::HashMap;
use std::sync::{LazyLock, Once};
use std::time::Duration;
use std::{env, str::FromStr};

/// Name looked up when the caller does not pick a connection explicitly
pub const DEFAULT_CONNECTION_NAME: &str = "DefaultConnection";

/// Number of attempts made to acquire a connection before an operation fails.
/// Default: 3
pub static DB_CONNECT_MAX_ATTEMPTS: LazyLock<u32> =
    LazyLock::new(|| env_or("DB_CONNECT_MAX_ATTEMPTS", 3).max(1));

/// Fixed pause between two acquisition attempts.
/// Default: 30ms
pub static DB_CONNECT_RETRY_DELAY: LazyLock<Duration> =
    LazyLock::new(|| Duration::from_millis(env_or("DB_CONNECT_RETRY_DELAY_MS", 30)));

/// Upper bound on pooled connections.
/// Default: 5
pub static DB_MAX_CONNECTIONS: LazyLock<u32> =
    LazyLock::new(|| env_or("DB_MAX_CONNECTIONS", 5).max(1));

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    load_dotenv();
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn load_dotenv() {
    static DOTENV: Once = Once::new();
    DOTENV.call_once(|| {
        dotenvy::dotenv().ok();
    });
}

/// Source of named connection strings.
pub trait ConnectionStringProvider: Send + Sync {
    /// Returns the connection string registered under `name`, if any
    fn connection_string(&self, name: &str) -> Option<String>;
}

/// Resolves connection strings from the process environment (and `.env`).
///
/// `DefaultConnection` is read from `CONNECTION_STRING_DEFAULT_CONNECTION`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvConnectionStrings;

impl EnvConnectionStrings {
    /// Environment variable consulted for a connection name
    pub fn env_key(name: &str) -> String {
        let mut key = String::from("CONNECTION_STRING_");
        let mut prev_lower = false;
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                if c.is_ascii_uppercase() && prev_lower {
                    key.push('_');
                }
                prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
                key.push(c.to_ascii_uppercase());
            } else {
                if !key.ends_with('_') {
                    key.push('_');
                }
                prev_lower = false;
            }
        }
        key
    }
}

impl ConnectionStringProvider for EnvConnectionStrings {
    fn connection_string(&self, name: &str) -> Option<String> {
        load_dotenv();
        env::var(Self::env_key(name))
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}

impl ConnectionStringProvider for HashMap<String, String> {
    fn connection_string(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}
