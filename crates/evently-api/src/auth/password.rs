//! Password hashing and verification with Argon2id.
//!
//! Cost parameters come from [`HashingConfig`] rather than being fixed:
//! raising memory or iterations buys offline-attack resistance, lowering
//! them buys login latency. The salt is random per hash and travels inside
//! the PHC string, so only the one column is stored.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use evently_core::config::HashingConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    HashingFailed(String),

    #[error("failed to verify password: {0}")]
    VerificationFailed(String),

    #[error("invalid password hash format")]
    InvalidHashFormat,
}

fn params(config: &HashingConfig) -> Result<Params, PasswordError> {
    Params::new(config.memory_cost, config.time_cost, config.parallelism, None)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// Hash a plaintext password. Returns a PHC string safe to store as-is.
pub fn hash_password(password: &str, config: &HashingConfig) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params(config)?,
    );

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC string.
///
/// A mismatch is `Ok(false)`, not an error; errors mean the stored hash is
/// unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}
