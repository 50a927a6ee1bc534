//! Backend entry-point: loads settings, migrates and seeds the database,
//! then serves the REST API.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use rand::RngCore;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use infusion_backend::inbound::http::health::HealthState;
use infusion_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use infusion_backend::outbound::token::HmacTokenIssuer;
use infusion_backend::seeding::{IdentitySeedSettings, seed_identity_on_startup};
#[cfg(feature = "metrics")]
use infusion_backend::server::make_metrics;
use infusion_backend::server::{
    ServerConfig, ServiceDependencies, build_http_state, create_server,
};
use infusion_backend::settings::AppSettings;

const EPHEMERAL_SECRET_LEN: usize = 64;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(err.to_string()))?;
    let seed_settings = IdentitySeedSettings::load_from_iter(program_name())
        .map_err(|err| io::Error::other(err.to_string()))?;

    let database_url = settings.database_url().map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;

    run_pending_migrations(database_url)
        .await
        .map_err(io::Error::other)?;

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(io::Error::other)?;

    let secret = load_token_secret(&settings.token_secret_file(), settings.token_allow_ephemeral)?;
    let clock = Arc::new(DefaultClock);
    let tokens = Arc::new(HmacTokenIssuer::new(secret, clock.clone()));

    seed_identity_on_startup(&seed_settings, &pool)
        .await
        .map_err(io::Error::other)?;

    let http_state = build_http_state(ServiceDependencies {
        pool,
        tokens,
        policy: settings.token_policy(),
        clock,
    });

    let config = ServerConfig::new(bind_addr);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, config)?;
    info!(%bind_addr, "listening");

    health_state.mark_ready();
    server.await
}

/// Only the program name, so seeding settings read files and environment
/// without tripping over server flags.
fn program_name() -> impl Iterator<Item = OsString> {
    std::env::args_os().take(1)
}

/// Read the token signing secret, or fall back to a random one for
/// development.
fn load_token_secret(path: &Path, allow_ephemeral: bool) -> io::Result<Zeroizing<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Zeroizing::new(bytes)),
        Err(e) => {
            if cfg!(debug_assertions) || allow_ephemeral {
                warn!(path = %path.display(), error = %e, "using temporary token secret (dev only)");
                let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
                rand::thread_rng().fill_bytes(&mut secret);
                Ok(secret)
            } else {
                Err(io::Error::other(format!(
                    "failed to read token secret at {}: {e}",
                    path.display()
                )))
            }
        }
    }
}
