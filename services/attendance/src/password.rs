//! Argon2id credential hashing. Stored credentials are PHC-format strings;
//! plaintext never reaches a repository or a log line.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::AttendanceServiceError;

pub fn hash_password(password: &str) -> Result<String, AttendanceServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AttendanceServiceError::Internal(anyhow::anyhow!("hash password: {e}")))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored: &str) -> Result<bool, AttendanceServiceError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AttendanceServiceError::Internal(anyhow::anyhow!("parse password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
