use std::num::NonZeroU32;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use super::errors::AccountError;

/// Opaque password hashing capability used by the account service
pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, AccountError>;
    /// False for a wrong password and for hashes this hasher cannot read
    fn verify_password(&self, password: &str, password_hash: &str) -> bool;
}

const PBKDF2_ITERATIONS: NonZeroU32 = NonZeroU32::MIN.saturating_add(999);
const SALT_LEN: usize = 16;
const SUBKEY_LEN: usize = 32;
const FORMAT_MARKER: u8 = 0x00;

/// PBKDF2-HMAC-SHA1 hasher.
///
/// Output is base64 of `0x00 | salt (16 bytes) | subkey (32 bytes)` with 1000
/// iterations, the layout used by ASP.NET Identity v2, so hashes stored by
/// those systems verify here and the other way round.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pbkdf2PasswordHasher;

impl PasswordHasher for Pbkdf2PasswordHasher {
    fn hash_password(&self, password: &str) -> Result<String, AccountError> {
        let mut salt = [0u8; SALT_LEN];
        SystemRandom::new()
            .fill(&mut salt)
            .map_err(|_| AccountError::new("Failed to generate password salt"))?;

        let mut subkey = [0u8; SUBKEY_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA1,
            PBKDF2_ITERATIONS,
            &salt,
            password.as_bytes(),
            &mut subkey,
        );

        let mut output = Vec::with_capacity(1 + SALT_LEN + SUBKEY_LEN);
        output.push(FORMAT_MARKER);
        output.extend_from_slice(&salt);
        output.extend_from_slice(&subkey);
        Ok(STANDARD.encode(output))
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        let Ok(decoded) = STANDARD.decode(password_hash.trim()) else {
            return false;
        };
        if decoded.len() != 1 + SALT_LEN + SUBKEY_LEN || decoded[0] != FORMAT_MARKER {
            return false;
        }

        let (salt, subkey) = decoded[1..].split_at(SALT_LEN);
        pbkdf2::verify(
            pbkdf2::PBKDF2_HMAC_SHA1,
            PBKDF2_ITERATIONS,
            salt,
            password.as_bytes(),
            subkey,
        )
        .is_ok()
    }
}
