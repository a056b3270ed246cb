use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Password hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Verified against when the account does not exist, so a failed login costs
/// the same whether or not the email is known.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_blocking("not-a-real-password-0").ok());

fn hash_blocking(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_blocking(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash a password with Argon2id on the blocking pool
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_blocking(&password)).await?
}

/// Verify `password` against `hash`. With no hash, a dummy verification is
/// still performed and the result is always `false`.
pub async fn verify_password(password: String, hash: Option<String>) -> Result<bool, PasswordError> {
    let verified = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_blocking(&password, &hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                verify_blocking(&password, dummy);
            }
            false
        }
    })
    .await?;
    Ok(verified)
}
