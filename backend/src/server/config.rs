//! Application configuration objects.
//!
//! All configuration is read once at process start into explicit structs and
//! passed by reference into the component constructors; nothing reads the
//! environment after startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use backend::domain::EmailAddress;
use backend::domain::ports::RiskClassifier;
use backend::inbound::http::session_config::{
    BuildMode, SessionConfigError, SessionSettings, session_settings_from_env,
};
use backend::outbound::persistence::DbPool;
use mockable::Env;
use url::Url;

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const BIND_ADDR_DEFAULT: &str = "0.0.0.0:8080";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const CONTACT_INBOX_ENV: &str = "CONTACT_INBOX";
const CONTACT_INBOX_DEBUG_DEFAULT: &str = "ops@screening.invalid";
const NOTIFY_ENDPOINT_ENV: &str = "NOTIFY_ENDPOINT";
const NOTIFY_SENDER_ENV: &str = "NOTIFY_SENDER";
const NOTIFY_TIMEOUT_SECS_ENV: &str = "NOTIFY_TIMEOUT_SECS";
const NOTIFY_TIMEOUT_SECS_DEFAULT: u64 = 10;
const MODEL_ARTIFACT_ENV: &str = "MODEL_ARTIFACT";
const MODEL_ARTIFACT_DEFAULT: &str = "model/artifact.json";

/// Errors raised while reading application configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Session toggles failed validation.
    #[error(transparent)]
    Session(#[from] SessionConfigError),
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}': {message}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Observed value.
        value: String,
        /// Parse failure description.
        message: String,
    },
}

/// Outbound notification relay settings.
pub struct NotifierSettings {
    /// Relay endpoint accepting the JSON message document.
    pub endpoint: Url,
    /// Sender address presented to the relay.
    pub sender: EmailAddress,
    /// Request timeout for delivery attempts.
    pub timeout: Duration,
}

/// Application configuration assembled from the environment at startup.
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string; absent means in-memory adapters.
    pub database_url: Option<String>,
    /// Cookie session settings.
    pub session: SessionSettings,
    /// Notification relay; absent means log-only delivery.
    pub notifier: Option<NotifierSettings>,
    /// Operations inbox copied on every contact submission.
    pub operations_inbox: EmailAddress,
    /// Path to the trained classifier artifact.
    pub classifier_artifact: PathBuf,
}

impl AppConfig {
    /// Read and validate the full application configuration.
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, ConfigError> {
        let bind_raw = env
            .string(BIND_ADDR_ENV)
            .unwrap_or_else(|| BIND_ADDR_DEFAULT.to_owned());
        let bind_addr: SocketAddr =
            bind_raw
                .parse()
                .map_err(|err: std::net::AddrParseError| ConfigError::InvalidEnv {
                    name: BIND_ADDR_ENV,
                    value: bind_raw.clone(),
                    message: err.to_string(),
                })?;

        let session = session_settings_from_env(env, mode)?;

        let operations_inbox = match env.string(CONTACT_INBOX_ENV) {
            Some(raw) => EmailAddress::new(raw.clone()).map_err(|err| ConfigError::InvalidEnv {
                name: CONTACT_INBOX_ENV,
                value: raw,
                message: err.to_string(),
            })?,
            None => {
                if mode == BuildMode::Release {
                    return Err(ConfigError::MissingEnv {
                        name: CONTACT_INBOX_ENV,
                    });
                }
                EmailAddress::new(CONTACT_INBOX_DEBUG_DEFAULT).map_err(|err| {
                    ConfigError::InvalidEnv {
                        name: CONTACT_INBOX_ENV,
                        value: CONTACT_INBOX_DEBUG_DEFAULT.to_owned(),
                        message: err.to_string(),
                    }
                })?
            }
        };

        let notifier = notifier_from_env(env)?;

        let classifier_artifact = PathBuf::from(
            env.string(MODEL_ARTIFACT_ENV)
                .unwrap_or_else(|| MODEL_ARTIFACT_DEFAULT.to_owned()),
        );

        Ok(Self {
            bind_addr,
            database_url: env.string(DATABASE_URL_ENV),
            session,
            notifier,
            operations_inbox,
            classifier_artifact,
        })
    }
}

fn notifier_from_env<E: Env>(env: &E) -> Result<Option<NotifierSettings>, ConfigError> {
    let Some(raw_endpoint) = env.string(NOTIFY_ENDPOINT_ENV) else {
        return Ok(None);
    };

    let endpoint = Url::parse(&raw_endpoint).map_err(|err| ConfigError::InvalidEnv {
        name: NOTIFY_ENDPOINT_ENV,
        value: raw_endpoint,
        message: err.to_string(),
    })?;

    let raw_sender = env
        .string(NOTIFY_SENDER_ENV)
        .ok_or(ConfigError::MissingEnv {
            name: NOTIFY_SENDER_ENV,
        })?;
    let sender = EmailAddress::new(raw_sender.clone()).map_err(|err| ConfigError::InvalidEnv {
        name: NOTIFY_SENDER_ENV,
        value: raw_sender,
        message: err.to_string(),
    })?;

    let timeout = match env.string(NOTIFY_TIMEOUT_SECS_ENV) {
        Some(raw) => Duration::from_secs(raw.parse().map_err(
            |err: std::num::ParseIntError| ConfigError::InvalidEnv {
                name: NOTIFY_TIMEOUT_SECS_ENV,
                value: raw.clone(),
                message: err.to_string(),
            },
        )?),
        None => Duration::from_secs(NOTIFY_TIMEOUT_SECS_DEFAULT),
    };

    Ok(Some(NotifierSettings {
        endpoint,
        sender,
        timeout,
    }))
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) notifier: Option<NotifierSettings>,
    pub(crate) operations_inbox: EmailAddress,
    pub(crate) classifier: Arc<dyn RiskClassifier>,
}

impl ServerConfig {
    /// Construct a server configuration from validated application settings.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        operations_inbox: EmailAddress,
        classifier: Arc<dyn RiskClassifier>,
    ) -> Self {
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
            bind_addr,
            db_pool: None,
            notifier: None,
            operations_inbox,
            classifier,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses the SQL-backed credential store and
    /// contact archive; otherwise it falls back to in-memory adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach notification relay settings.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Option<NotifierSettings>) -> Self {
        self.notifier = notifier;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Configuration parsing coverage.
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with(values: Vec<(&'static str, String)>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| {
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
        });
        env
    }

    #[test]
    fn debug_mode_fills_in_defaults() {
        let env = env_with(vec![]);
        let config = AppConfig::from_env(&env, BuildMode::Debug).expect("valid config");
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.database_url.is_none());
        assert!(config.notifier.is_none());
        assert_eq!(
            config.operations_inbox.as_ref(),
            CONTACT_INBOX_DEBUG_DEFAULT
        );
        assert_eq!(
            config.classifier_artifact,
            PathBuf::from(MODEL_ARTIFACT_DEFAULT)
        );
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let env = env_with(vec![(BIND_ADDR_ENV, "not-an-addr".to_owned())]);
        let err = match AppConfig::from_env(&env, BuildMode::Debug) {
            Err(e) => e,
            Ok(_) => panic!("must fail"),
        };
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: BIND_ADDR_ENV,
                ..
            }
        ));
    }

    #[test]
    fn notify_endpoint_requires_a_sender() {
        let env = env_with(vec![(
            NOTIFY_ENDPOINT_ENV,
            "https://relay.example/send".to_owned(),
        )]);
        let err = match AppConfig::from_env(&env, BuildMode::Debug) {
            Err(e) => e,
            Ok(_) => panic!("must fail"),
        };
        assert!(matches!(
            err,
            ConfigError::MissingEnv {
                name: NOTIFY_SENDER_ENV
            }
        ));
    }

    #[rstest]
    #[case("not-a-url")]
    #[case("relay.example/send")]
    fn invalid_notify_endpoint_is_rejected(#[case] raw: &str) {
        let env = env_with(vec![
            (NOTIFY_ENDPOINT_ENV, raw.to_owned()),
            (NOTIFY_SENDER_ENV, "portal@screening.example".to_owned()),
        ]);
        let err = match AppConfig::from_env(&env, BuildMode::Debug) {
            Err(e) => e,
            Ok(_) => panic!("must fail"),
        };
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: NOTIFY_ENDPOINT_ENV,
                ..
            }
        ));
    }

    #[test]
    fn configured_notifier_is_parsed() {
        let env = env_with(vec![
            (NOTIFY_ENDPOINT_ENV, "https://relay.example/send".to_owned()),
            (NOTIFY_SENDER_ENV, "portal@screening.example".to_owned()),
            (NOTIFY_TIMEOUT_SECS_ENV, "3".to_owned()),
        ]);
        let config = AppConfig::from_env(&env, BuildMode::Debug).expect("valid config");
        let notifier = config.notifier.expect("notifier configured");
        assert_eq!(notifier.endpoint.as_str(), "https://relay.example/send");
        assert_eq!(notifier.timeout, Duration::from_secs(3));
    }
}
