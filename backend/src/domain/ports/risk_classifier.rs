//! Port abstraction for the pre-trained risk classifier.

use crate::domain::{FeatureVector, RiskLabel};

use super::define_port_error;

define_port_error! {
    /// Failures raised by classifier adapters.
    pub enum ClassifierError {
        /// The trained artifact is missing, unreadable, or the wrong shape.
        Artifact { message: String } => "classifier artifact invalid: {message}",
        /// The supplied features cannot be evaluated.
        InvalidFeatures { message: String } => "classifier rejected features: {message}",
    }
}

/// Driven port for binary risk prediction.
///
/// Treated as pure and side-effect-free by every flow: the artifact is loaded
/// once at startup and evaluation never performs I/O.
pub trait RiskClassifier: Send + Sync {
    /// Map an ordered feature vector to a binary label.
    fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ClassifierError>;
}
