//! Driving port for the credential lifecycle use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! run the signup/login/change-password flows without knowing the backing
//! store or hasher, which keeps HTTP handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, PasswordChange, SignupDetails, User};

/// Discriminated outcome of the signup flow.
///
/// The user-correctable kinds are never folded into `Internal`; adapters
/// surface them as conflict responses the caller can act on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignupError {
    /// The requested username is already registered.
    #[error("username already exists")]
    DuplicateUsername,
    /// The requested email is already registered.
    #[error("email already exists")]
    DuplicateEmail,
    /// Unexpected store or hasher failure; fatal for this request only.
    #[error(transparent)]
    Internal(#[from] Error),
}

/// Discriminated outcome shared by the login and change-password flows.
///
/// `NotRegistered` and `InvalidCredentials` are distinguishable internally;
/// adapters may present them with identical user-facing text but must not
/// conflate the underlying conditions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CredentialFlowError {
    /// No user exists for the supplied username.
    #[error("not registered")]
    NotRegistered,
    /// The user exists but the password did not verify.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Unexpected store or hasher failure; fatal for this request only.
    #[error(transparent)]
    Internal(#[from] Error),
}

/// Domain use-case port for the credential lifecycle.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user after uniqueness checks pass.
    async fn signup(&self, details: SignupDetails) -> Result<User, SignupError>;

    /// Validate credentials and return the authenticated user.
    ///
    /// Session binding is the caller's responsibility; the flow itself only
    /// reads the store.
    async fn login(&self, credentials: LoginCredentials) -> Result<User, CredentialFlowError>;

    /// Re-authenticate by current password and replace the stored hash.
    async fn change_password(&self, change: PasswordChange) -> Result<(), CredentialFlowError>;
}
