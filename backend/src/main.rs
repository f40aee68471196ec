//! Backend entry-point: loads keys and settings, seeds the first administrator
//! and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use clinic::config::{ClinicSettings, cipher_key_from_env};
use clinic::domain::cipher::FieldCipher;
use clinic::inbound::http::health::HealthState;
use clinic::inbound::http::session_config::{BuildMode, session_settings_from_env};
use clinic::outbound::memory::MemoryStore;
use server::{ServerConfig, create_server, seed_bootstrap_admin};

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

    let settings =
        ClinicSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let bootstrap_admin = settings.bootstrap_admin().map_err(std::io::Error::other)?;

    let env = DefaultEnv::new();
    let cipher_key = cipher_key_from_env(&env).map_err(std::io::Error::other)?;
    let cipher = Arc::new(FieldCipher::new(&cipher_key));
    drop(cipher_key);
    info!(fingerprint = cipher.key_fingerprint(), "field cipher ready");

    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.fingerprint, "session key loaded");

    let store = MemoryStore::new();
    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        cipher,
    );
    let (server, http_state) = create_server(health_state.clone(), config, &store)?;

    if let Some(draft) = bootstrap_admin {
        seed_bootstrap_admin(&http_state, draft)
            .await
            .map_err(std::io::Error::other)?;
    }

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    server.await
}
