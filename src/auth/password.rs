//! Password hashing and verification using Argon2id

use crate::error::AppError;
use argon2::{Algorithm, Argon2, Params, Version};
use once_cell::sync::Lazy;
use password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};

/// Hash checked when the identifier is unknown, so a login against a missing
/// account costs the same as one against an existing account.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    PasswordHasher::new()
        .hash("ymhs-dummy-password")
        .unwrap_or_default()
});

/// Password hasher with configurable parameters
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create hasher with default parameters (OWASP recommended)
    pub fn new() -> Self {
        // m=64MiB, t=3 iterations, p=4 lanes
        let params = Params::new(65536, 3, 4, None).unwrap_or_default();

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Self { argon2 }
    }

    /// Hash a password with a fresh random salt, returning a PHC string
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a stored hash
    ///
    /// Parameters and salt come from the PHC string, so hashes produced with
    /// older parameters still verify.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is unparseable: {:?}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Burn the same work as `verify` for an identifier with no account
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &DUMMY_HASH);
    }

    /// Validate password against the configured minimum length
    pub fn validate_password_policy(password: &str, min_length: usize) -> Result<(), AppError> {
        if password.trim().is_empty() {
            return Err(AppError::BadRequest("Password is required".to_string()));
        }

        if password.chars().count() < min_length {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters",
                min_length
            )));
        }

        Ok(())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
