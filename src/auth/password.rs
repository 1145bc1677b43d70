use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::utils::error::ApiError;

/// Salted, costed hash; the PHC string embeds salt and parameters.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Returns false on mismatch or on an unparseable stored hash; callers
/// report the same invalid-credentials error either way.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    PasswordHash::new(hashed)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(verify_password("s3cret-pass", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(!verify_password("not-the-password", &hash));
    }

    #[test]
    fn garbage_stored_hash_is_rejected_not_a_panic() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn hash_is_salted() {
        let first = hash_password("same-input").unwrap();
        let second = hash_password("same-input").unwrap();
        assert_ne!(first, second);
    }
}
