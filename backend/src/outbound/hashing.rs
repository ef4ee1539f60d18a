//! Argon2id password hasher adapter.
//!
//! Implements the [`PasswordHasher`] port with the `argon2` crate: a fresh
//! random salt per call, default Argon2id parameters, PHC string output. The
//! underlying verification is constant-time with respect to mismatch.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
};

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id-backed implementation of the `PasswordHasher` port.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Create a hasher with the default (memory-hard) Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        PasswordHash::new(hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, plaintext: &str, stored: &PasswordHash) -> Result<bool, PasswordHashError> {
        let parsed = PhcString::new(stored.expose())
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        Ok(self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}
