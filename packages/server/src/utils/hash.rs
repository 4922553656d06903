//! Salted keyed hashing for admin passwords.
//!
//! Each admin row stores a random salt and `HMAC-SHA256(key = salt, password)`,
//! both hex-encoded.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("stored password hash is not valid hex: {0}")]
    MalformedHash(#[from] hex::FromHexError),
    #[error("salt is not usable as an HMAC key")]
    InvalidKey,
}

/// Salt and digest ready to be written to an `admin` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword {
    pub salt: String,
    pub hashed_password: String,
}

/// Generate a fresh hex-encoded salt.
pub fn make_salt() -> String {
    let bytes: [u8; SALT_LEN] = rand::random();
    hex::encode(bytes)
}

fn keyed(salt: &str, password: &str) -> Result<HmacSha256, PasswordError> {
    let mut mac =
        HmacSha256::new_from_slice(salt.as_bytes()).map_err(|_| PasswordError::InvalidKey)?;
    mac.update(password.as_bytes());
    Ok(mac)
}

/// Hash `password` with the given salt.
pub fn hash_with_salt(password: &str, salt: &str) -> Result<String, PasswordError> {
    Ok(hex::encode(keyed(salt, password)?.finalize().into_bytes()))
}

/// Hash `password` under a newly generated salt.
pub fn hash_password(password: &str) -> Result<HashedPassword, PasswordError> {
    let salt = make_salt();
    let hashed_password = hash_with_salt(password, &salt)?;
    Ok(HashedPassword {
        salt,
        hashed_password,
    })
}

/// Check `password` against a stored salt and digest in constant time.
pub fn verify_password(
    password: &str,
    salt: &str,
    hashed_password: &str,
) -> Result<bool, PasswordError> {
    if password.is_empty() {
        return Ok(false);
    }
    let expected = hex::decode(hashed_password)?;
    Ok(keyed(salt, password)?.verify_slice(&expected).is_ok())
}
