//! Domain primitives, flows, and ports.
//!
//! Purpose: define strongly typed domain entities and the credential,
//! contact, and screening use-cases over explicit ports. Types are immutable
//! and document their invariants in Rustdoc; inbound and outbound adapters
//! depend on this module, never the reverse.

pub mod auth;
pub mod auth_service;
pub mod contact;
pub mod contact_service;
pub mod error;
pub mod ports;
pub mod screening;
pub mod trace_id;
pub mod user;

pub use self::auth::{CredentialValidationError, LoginCredentials, PasswordChange, SignupDetails};
pub use self::auth_service::CredentialAuthService;
pub use self::contact::{CONTACT_FIELD_MAX, ContactMessage, ContactValidationError};
pub use self::contact_service::ContactService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::screening::{
    FEATURE_COUNT, FeatureInputs, FeatureVector, FeatureVectorError, RiskLabel,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, PasswordHash, PhoneNumber, User, UserId, UserValidationError, Username,
};
