use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    Hash(String),

    #[error("Stored hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hashes a password or security answer with argon2id and a random salt.
pub fn hash_secret(secret: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Returns `Ok(false)` on mismatch; `Err` only if the stored hash cannot be parsed.
pub fn verify_secret(secret: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

/// Security answers are compared case- and whitespace-insensitively.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}
