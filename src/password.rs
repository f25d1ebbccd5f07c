//! Password hashing and verification.
//!
//! Argon2id behind two async helpers; the hashing parameters live here
//! and nowhere else. Callers treat the hash as an opaque string.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};

/// Errors from hashing or verifying a password.
#[derive(Debug)]
pub enum PasswordError {
    /// The password does not match the stored hash.
    Mismatch,
    /// Hashing machinery failed; message passed through.
    Internal(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::Mismatch => write!(f, "Password does not match"),
            PasswordError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PasswordError {}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).map_err(|e| PasswordError::Internal(e.to_string()))?,
    ))
}

/// Hash a password. Runs on the blocking pool; Argon2id is deliberately
/// expensive.
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand_core::OsRng);
        hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::Internal(e.to_string()))
    })
    .await
    .map_err(|e| PasswordError::Internal(e.to_string()))?
}

/// Verify a password candidate against a stored hash.
pub async fn verify_password(password: String, stored_hash: String) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|e| PasswordError::Internal(e.to_string()))?;
        hasher()?
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|e| match e {
                argon2::password_hash::Error::Password => PasswordError::Mismatch,
                other => PasswordError::Internal(other.to_string()),
            })
    })
    .await
    .map_err(|e| PasswordError::Internal(e.to_string()))?
}
