//! Outbound adapters implementing the domain's driven ports.

pub mod classifier;
pub mod hashing;
pub mod notify;
pub mod persistence;

pub use classifier::ArtifactClassifier;
pub use hashing::Argon2PasswordHasher;
pub use notify::HttpNotificationSender;
