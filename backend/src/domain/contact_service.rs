//! Contact flow: archive the submission, then forward it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    ContactIntake, ContactRepository, ContactStoreError, NotificationSender,
};
use crate::domain::{ContactMessage, EmailAddress, Error};

/// Subject line used for forwarded contact submissions.
const CONTACT_SUBJECT: &str = "CONTACT MESSAGE RECEIVED";

/// [`ContactIntake`] implementation over the archive and notification ports.
#[derive(Clone)]
pub struct ContactService {
    archive: Arc<dyn ContactRepository>,
    notifier: Arc<dyn NotificationSender>,
    operations_inbox: EmailAddress,
}

fn map_archive_error(error: ContactStoreError) -> Error {
    match error {
        ContactStoreError::Connection { message } => Error::service_unavailable(message),
        ContactStoreError::Query { message } => Error::internal(message),
    }
}

impl ContactService {
    /// Create the service; `operations_inbox` receives a copy of every
    /// submission alongside the submitter.
    pub fn new(
        archive: Arc<dyn ContactRepository>,
        notifier: Arc<dyn NotificationSender>,
        operations_inbox: EmailAddress,
    ) -> Self {
        Self {
            archive,
            notifier,
            operations_inbox,
        }
    }

    fn body_for(message: &ContactMessage) -> String {
        format!(
            "Here are your contents:\n\n\
             Name: {name}\n\
             Email: {email}\n\
             Phone number: {phone}\n\
             Message sent: {body}",
            name = message.name(),
            email = message.email(),
            phone = message.phone(),
            body = message.message(),
        )
    }
}

#[async_trait]
impl ContactIntake for ContactService {
    async fn submit(&self, message: ContactMessage) -> Result<(), Error> {
        // Archive first; a delivery failure must not lose the submission.
        self.archive
            .record(&message)
            .await
            .map_err(map_archive_error)?;

        let recipients = [message.email().clone(), self.operations_inbox.clone()];
        self.notifier
            .send(&recipients, CONTACT_SUBJECT, &Self::body_for(&message))
            .await
            .map_err(|error| Error::internal(error.to_string()))?;

        info!(sender = message.name(), "contact submission forwarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Archive/notify ordering and failure surfacing.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{InMemoryContactRepository, NotificationError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSender {
        deliveries: Mutex<Vec<(Vec<String>, String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(
            &self,
            recipients: &[EmailAddress],
            subject: &str,
            body: &str,
        ) -> Result<(), NotificationError> {
            if self.fail {
                return Err(NotificationError::transport("relay unreachable"));
            }
            let mut deliveries = self.deliveries.lock().expect("deliveries lock");
            deliveries.push((
                recipients.iter().map(|r| r.as_ref().to_owned()).collect(),
                subject.to_owned(),
                body.to_owned(),
            ));
            Ok(())
        }
    }

    fn message() -> ContactMessage {
        ContactMessage::try_from_parts("Ada", "ada@x.com", "555-0100", "please call back")
            .expect("valid contact message")
    }

    fn ops_inbox() -> EmailAddress {
        EmailAddress::new("ops@portal.example").expect("valid inbox")
    }

    #[tokio::test]
    async fn submit_archives_then_notifies_submitter_and_operations() {
        let archive = Arc::new(InMemoryContactRepository::new());
        let sender = Arc::new(RecordingSender::default());
        let service = ContactService::new(archive.clone(), sender.clone(), ops_inbox());

        service.submit(message()).await.expect("submit succeeds");

        assert_eq!(archive.recorded(), vec![message()]);
        let deliveries = sender.deliveries.lock().expect("deliveries lock");
        let (recipients, subject, body) = deliveries.first().expect("one delivery");
        assert_eq!(
            recipients,
            &vec!["ada@x.com".to_owned(), "ops@portal.example".to_owned()]
        );
        assert_eq!(subject, CONTACT_SUBJECT);
        assert!(body.contains("Name: Ada"));
        assert!(body.contains("Message sent: please call back"));
    }

    #[tokio::test]
    async fn delivery_failure_surfaces_as_internal_but_keeps_the_archive_row() {
        let archive = Arc::new(InMemoryContactRepository::new());
        let sender = Arc::new(RecordingSender {
            fail: true,
            ..RecordingSender::default()
        });
        let service = ContactService::new(archive.clone(), sender, ops_inbox());

        let err = service.submit(message()).await.expect_err("delivery fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(archive.recorded(), vec![message()]);
    }
}
