//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_flows;
mod contact_intake;
mod contact_repository;
mod credential_repository;
mod notification_sender;
mod password_hasher;
mod risk_classifier;

pub use auth_flows::{AuthService, CredentialFlowError, SignupError};
pub use contact_intake::ContactIntake;
pub use contact_repository::{ContactRepository, ContactStoreError, InMemoryContactRepository};
pub use credential_repository::{
    CredentialRepository, CredentialStoreError, InMemoryCredentialRepository, NewUser,
    unique_fields,
};
pub use notification_sender::{LogOnlyNotificationSender, NotificationError, NotificationSender};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use risk_classifier::{ClassifierError, RiskClassifier};
