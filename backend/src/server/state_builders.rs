//! Builders for HTTP state ports with database-or-in-memory fallbacks.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    ContactRepository, CredentialRepository, InMemoryContactRepository,
    InMemoryCredentialRepository, LogOnlyNotificationSender, NotificationSender,
};
use backend::domain::{ContactService, CredentialAuthService};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{DieselContactRepository, DieselCredentialRepository};
use backend::outbound::{Argon2PasswordHasher, HttpNotificationSender};

use super::ServerConfig;

/// Select persistence adapters: SQL-backed when a pool is configured,
/// in-memory otherwise (local development and tests).
fn build_repositories(
    config: &ServerConfig,
) -> (Arc<dyn CredentialRepository>, Arc<dyn ContactRepository>) {
    match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselCredentialRepository::new(pool.clone())),
            Arc::new(DieselContactRepository::new(pool.clone())),
        ),
        None => (
            Arc::new(InMemoryCredentialRepository::new()),
            Arc::new(InMemoryContactRepository::new()),
        ),
    }
}

fn build_notifier(config: &ServerConfig) -> std::io::Result<Arc<dyn NotificationSender>> {
    match &config.notifier {
        Some(settings) => {
            let sender = HttpNotificationSender::new(
                settings.endpoint.clone(),
                settings.sender.clone(),
                settings.timeout,
            )
            .map_err(|err| {
                std::io::Error::other(format!("notification client construction failed: {err}"))
            })?;
            Ok(Arc::new(sender))
        }
        None => Ok(Arc::new(LogOnlyNotificationSender)),
    }
}

/// Build the shared HTTP state from configured ports and fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let (credentials, contact_archive) = build_repositories(config);
    let notifier = build_notifier(config)?;

    let auth = Arc::new(CredentialAuthService::new(
        credentials.clone(),
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let contact = Arc::new(ContactService::new(
        contact_archive,
        notifier,
        config.operations_inbox.clone(),
    ));

    Ok(web::Data::new(HttpState::new(
        auth,
        credentials,
        contact,
        config.classifier.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use backend::domain::ports::{ClassifierError, RiskClassifier};
    use backend::domain::{EmailAddress, FeatureVector, RiskLabel, SignupDetails};
    use backend::inbound::http::session_config::SessionSettings;

    struct StubClassifier;

    impl RiskClassifier for StubClassifier {
        fn predict(&self, _: &FeatureVector) -> Result<RiskLabel, ClassifierError> {
            Ok(RiskLabel::Negative)
        }
    }

    fn pool_less_config() -> ServerConfig {
        ServerConfig::new(
            SessionSettings {
                key: Key::generate(),
                cookie_secure: false,
                same_site: SameSite::Lax,
            },
            "127.0.0.1:0".parse().expect("socket addr"),
            EmailAddress::new("ops@screening.invalid").expect("valid inbox"),
            Arc::new(StubClassifier),
        )
    }

    #[tokio::test]
    async fn pool_less_config_serves_working_in_memory_flows() {
        let state = build_http_state(&pool_less_config()).expect("state builds");

        let details = SignupDetails::try_from_parts("alice", "pw1", "555-0100", "a@x.com")
            .expect("valid signup");
        let user = state.auth.signup(details).await.expect("signup succeeds");

        let found = state
            .credentials
            .find_by_id(user.id())
            .await
            .expect("lookup succeeds")
            .expect("user stored");
        assert_eq!(found.username().as_ref(), "alice");
    }
}
