//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthService, ContactIntake, CredentialRepository, RiskClassifier};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential lifecycle flows.
    pub auth: Arc<dyn AuthService>,
    /// Credential store, used to resolve session principals.
    pub credentials: Arc<dyn CredentialRepository>,
    /// Contact submission flow.
    pub contact: Arc<dyn ContactIntake>,
    /// Pre-trained risk classifier.
    pub classifier: Arc<dyn RiskClassifier>,
}

impl HttpState {
    /// Bundle the port implementations for handler injection.
    pub fn new(
        auth: Arc<dyn AuthService>,
        credentials: Arc<dyn CredentialRepository>,
        contact: Arc<dyn ContactIntake>,
        classifier: Arc<dyn RiskClassifier>,
    ) -> Self {
        Self {
            auth,
            credentials,
            contact,
            classifier,
        }
    }
}
