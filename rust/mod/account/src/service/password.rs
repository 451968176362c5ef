use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::service::AccountError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AccountError::Internal(format!("failed to hash password: {}", e)))
}

/// Check a password against a stored PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::Validation(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn malformed_hash_rejects() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn length_rule() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
