//! Port abstraction for the contact-message archive.

use async_trait::async_trait;

use crate::domain::ContactMessage;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by contact archive adapters.
    pub enum ContactStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "contact archive connection failed: {message}",
        /// Insert failed during execution.
        Query { message: String } => "contact archive insert failed: {message}",
    }
}

/// Driven port for archiving contact submissions.
///
/// Messages are written once and never read back by any flow; the archive
/// exists for operational follow-up outside this service.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Append a submission to the archive.
    async fn record(&self, message: &ContactMessage) -> Result<(), ContactStoreError>;
}

/// Mutex-guarded in-memory archive used as the pool-less fallback and in
/// tests, which can inspect what was recorded.
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    messages: std::sync::Mutex<Vec<ContactMessage>>,
}

impl InMemoryContactRepository {
    /// Create an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn recorded(&self) -> Vec<ContactMessage> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn record(&self, message: &ContactMessage) -> Result<(), ContactStoreError> {
        let mut messages = self
            .messages
            .lock()
            .map_err(|_| ContactStoreError::query("contact archive lock poisoned"))?;
        messages.push(message.clone());
        Ok(())
    }
}
