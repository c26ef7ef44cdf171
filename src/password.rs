use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::error::AuthError;

/// PasswordEncoder
///
/// The hashing contract used by signup (to store a password) and by the
/// authenticator (to check one). Implementations must salt every hash.
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw: &str) -> Result<String, AuthError>;

    /// Returns false for a wrong password and for a hash it cannot parse.
    fn matches(&self, raw: &str, encoded: &str) -> bool;
}

/// PasswordEncoderState
///
/// Shared handle to the encoder held in the application state.
pub type PasswordEncoderState = Arc<dyn PasswordEncoder>;

/// Argon2id with a random salt per hash, PHC string output.
#[derive(Default)]
pub struct Argon2PasswordEncoder {
    argon2: Argon2<'static>,
}

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    fn matches(&self, raw: &str, encoded: &str) -> bool {
        let parsed = match PasswordHash::new(encoded) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored password hash is unreadable: {}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(raw.as_bytes(), &parsed)
            .map_err(|err| tracing::trace!("Password verification failed: {}", err))
            .is_ok()
    }
}
