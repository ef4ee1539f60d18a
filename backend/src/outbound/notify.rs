//! Reqwest-backed notification relay adapter.
//!
//! This adapter owns transport details only: payload serialisation, timeout
//! and HTTP error mapping. The relay endpoint is any HTTP service accepting a
//! JSON `{from, to, subject, text}` document (a hosted mail API or an
//! internal forwarding service).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::domain::EmailAddress;
use crate::domain::ports::{NotificationError, NotificationSender};

/// Notification adapter that POSTs each message to one relay endpoint.
pub struct HttpNotificationSender {
    client: Client,
    endpoint: Url,
    sender: EmailAddress,
}

/// JSON document accepted by the relay.
#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: &'a str,
}

impl HttpNotificationSender {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        sender: EmailAddress,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            sender,
        })
    }
}

#[async_trait]
impl NotificationSender for HttpNotificationSender {
    async fn send(
        &self,
        recipients: &[EmailAddress],
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let message = RelayMessage {
            from: self.sender.as_ref(),
            to: recipients.iter().map(AsRef::as_ref).collect(),
            subject,
            text: body,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&message)
            .send()
            .await
            .map_err(|err| NotificationError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NotificationError::rejected(format!(
                "relay returned {status}: {detail}"
            )));
        }
        Ok(())
    }
}
