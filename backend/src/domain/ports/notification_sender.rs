//! Port abstraction for outbound notification delivery.

use async_trait::async_trait;
use tracing::info;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Delivery failures raised by notification adapters.
    pub enum NotificationError {
        /// The relay endpoint could not be reached.
        Transport { message: String } => "notification transport failed: {message}",
        /// The relay accepted the connection but rejected the message.
        Rejected { message: String } => "notification rejected by relay: {message}",
    }
}

/// Driven port for one-shot notification delivery.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver a message to every recipient.
    async fn send(
        &self,
        recipients: &[EmailAddress],
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError>;
}

/// Sender that records the delivery attempt in the log instead of sending.
///
/// Used when no relay endpoint is configured (local development and tests).
/// Only addressing metadata is logged, never the message body.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyNotificationSender;

#[async_trait]
impl NotificationSender for LogOnlyNotificationSender {
    async fn send(
        &self,
        recipients: &[EmailAddress],
        subject: &str,
        _body: &str,
    ) -> Result<(), NotificationError> {
        info!(
            recipients = recipients.len(),
            subject, "notification delivery suppressed: no relay configured"
        );
        Ok(())
    }
}
