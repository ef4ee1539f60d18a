//! Backend entry-point: wires configuration, adapters, and the HTTP server.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, key_fingerprint};
use backend::outbound::ArtifactClassifier;
use backend::outbound::persistence::{DbPool, PoolConfig};
use server::{AppConfig, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::default();
    let config = AppConfig::from_env(&env, BuildMode::from_debug_assertions())
        .map_err(|err| std::io::Error::other(format!("configuration error: {err}")))?;

    info!(
        session_key = %key_fingerprint(&config.session.key),
        bind_addr = %config.bind_addr,
        "configuration loaded"
    );

    let classifier = ArtifactClassifier::from_path(&config.classifier_artifact)
        .map_err(|err| std::io::Error::other(format!("classifier artifact error: {err}")))?;

    let mut server_config = ServerConfig::new(
        config.session,
        config.bind_addr,
        config.operations_inbox,
        Arc::new(classifier),
    )
    .with_notifier(config.notifier);

    if let Some(database_url) = config.database_url {
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|err| std::io::Error::other(format!("database pool error: {err}")))?;
        server_config = server_config.with_db_pool(pool);
    } else {
        warn!("DATABASE_URL not set; using in-memory stores (dev only)");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, server_config)?;
    server.await
}
