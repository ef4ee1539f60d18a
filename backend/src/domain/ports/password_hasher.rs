//! Port abstraction for one-way password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hasher adapters.
    pub enum PasswordHashError {
        /// Hashing the plaintext failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed for verification.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Driven port for salted one-way password hashing.
///
/// ## Contract
/// - `hash` embeds a fresh random salt per call, so hashing the same
///   plaintext twice yields different outputs that both verify.
/// - `verify` is constant-time with respect to early mismatch.
/// - Neither operation logs or stores the plaintext.
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted one-way hash of the plaintext.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check the plaintext against a stored hash.
    fn verify(&self, plaintext: &str, stored: &PasswordHash) -> Result<bool, PasswordHashError>;
}
