//! Argon2id password hashing, verification, and strength validation.
//!
//! Hashes are stored as PHC strings so the salt and parameters travel with
//! the hash.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum length accepted for admin passwords.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash of a throwaway password, verified against when a login names an
/// unknown user so that both failure paths cost one Argon2 verification.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("tokenprint-unknown-user").expect("hashing a constant password succeeds")
});

/// The PHC hash to verify against when no admin matches the username.
pub fn dummy_hash() -> &'static str {
    &DUMMY_HASH
}

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch and `Err` only when the stored hash is
/// malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check an admin password against the minimum length.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("kiosk-admin-pass").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("kiosk-admin-pass", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_dummy_hash_is_argon2_and_rejects_everything() {
        assert!(dummy_hash().starts_with("$argon2id$"));
        assert!(!verify_password("kiosk-admin-pass", dummy_hash()).expect("verify should succeed"));
        assert!(!verify_password("", dummy_hash()).expect("verify should succeed"));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("kiosk-admin-pass").expect("hashing should succeed");
        assert!(!verify_password("not-the-pass", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_password_strength() {
        let msg = validate_password_strength("short", MIN_PASSWORD_LENGTH).unwrap_err();
        assert!(msg.contains("at least 8 characters"));
        assert!(validate_password_strength("eightchr", MIN_PASSWORD_LENGTH).is_ok());
    }
}
