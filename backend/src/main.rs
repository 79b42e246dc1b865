//! SaveABlood server entry-point: loads settings, prepares storage and
//! serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use saveablood::domain::PasswordHasher;
use saveablood::inbound::http::health::HealthState;
use saveablood::inbound::http::session_config::{
    BuildMode, SessionToggles, key_fingerprint, session_settings,
};
use saveablood::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;

    let session = session_settings(
        SessionToggles {
            key_file: settings.session_key_file(),
            cookie_secure: settings.cookie_secure,
            allow_ephemeral: settings.allow_ephemeral_session_key,
        },
        BuildMode::from_debug_assertions(),
    )?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session signing key loaded"
    );

    let hasher = PasswordHasher::new(settings.hash_iterations())
        .wrap_err("invalid password hash iterations")?;
    let bind_addr = settings.bind_addr();
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        hasher,
    )
    .with_seed_banks(settings.seed_banks);

    match settings.database_url() {
        Some(url) => {
            let applied = run_pending_migrations(url).await?;
            info!(applied, "database migrations complete");
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; ledger state is kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("server terminated with an error")?;
    Ok(())
}
