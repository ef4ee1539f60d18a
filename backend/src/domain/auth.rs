//! Authentication payload primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Plaintext passwords live in zeroizing buffers and are redacted from
//! `Debug` output; no type in this module can serialise them back out.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{EmailAddress, PhoneNumber, UserValidationError, Username};

/// Domain error returned when an auth payload value is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username, email, or phone failed shape validation.
    Identity(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<UserValidationError> for CredentialValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Identity(value)
    }
}

fn validated_password(password: &str) -> Result<Zeroizing<String>, CredentialValidationError> {
    // Passwords keep caller-provided whitespace to avoid surprising
    // credential comparisons; only fully empty input is rejected.
    if password.is_empty() {
        return Err(CredentialValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials used by authentication flows.
///
/// ## Invariants
/// - `username` satisfies [`Username`] validation (trimmed, non-empty).
/// - `password` is non-empty and retains caller-provided whitespace.
#[derive(Clone)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: validated_password(password)?,
        })
    }

    /// Username suitable for user lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated signup form: identity fields plus the initial password.
#[derive(Clone)]
pub struct SignupDetails {
    username: Username,
    email: EmailAddress,
    phone: PhoneNumber,
    password: Zeroizing<String>,
}

impl SignupDetails {
    /// Construct signup details from raw form inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        phone: &str,
        email: &str,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            phone: PhoneNumber::new(phone)?,
            password: validated_password(password)?,
        })
    }

    /// Requested login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested contact email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Requested contact phone number.
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    /// Initial password to be hashed by the signup flow.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for SignupDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupDetails")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated change-password request.
///
/// The flow re-authenticates by the current password; no session is required.
#[derive(Clone)]
pub struct PasswordChange {
    username: Username,
    current_password: Zeroizing<String>,
    new_password: Zeroizing<String>,
}

impl PasswordChange {
    /// Construct a change-password request from raw form inputs.
    pub fn try_from_parts(
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            current_password: validated_password(current_password)?,
            new_password: validated_password(new_password)?,
        })
    }

    /// Username suitable for user lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password the user is currently registered with.
    pub fn current_password(&self) -> &str {
        self.current_password.as_str()
    }

    /// Replacement password to be hashed on success.
    pub fn new_password(&self) -> &str {
        self.new_password.as_str()
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange")
            .field("username", &self.username)
            .field("current_password", &"<redacted>")
            .field("new_password", &"<redacted>")
            .finish()
    }
}
