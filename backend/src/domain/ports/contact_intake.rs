//! Driving port for contact-form submissions.

use async_trait::async_trait;

use crate::domain::{ContactMessage, Error};

/// Domain use-case port for the contact flow.
///
/// Delivery failure is not handled specially: it surfaces to the caller as a
/// generic failure via the domain [`Error`].
#[async_trait]
pub trait ContactIntake: Send + Sync {
    /// Archive the submission and forward it to the notification channel.
    async fn submit(&self, message: ContactMessage) -> Result<(), Error>;
}
