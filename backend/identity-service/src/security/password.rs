/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use error_types::{ServiceError, ServiceResult};

use crate::validators::validate_password;

/// Hash a password using Argon2id
///
/// ## Security
///
/// - Algorithm: Argon2id (default configuration)
/// - Salt: random per password
///
/// Returns a PHC-formatted hash string safe for storage. Fails with
/// `InvalidInput` if the password does not meet the length rule.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    if !validate_password(password) {
        return Err(ServiceError::invalid_input(
            "password must be between 8 and 128 characters",
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its hash (constant-time)
pub fn verify_password(password: &str, password_hash: &str) -> ServiceResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| ServiceError::internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ServiceError::internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

/// Argon2 is deliberately slow; keep it off the async workers.
pub async fn hash_password_blocking(password: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::internal(format!("hashing task failed: {e}")))?
}

pub async fn verify_password_blocking(password: String, password_hash: String) -> ServiceResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| ServiceError::internal(format!("verification task failed: {e}")))?
}
