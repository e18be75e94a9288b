//! Backend entry-point: loads settings, prepares persistence and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use applicant_backend::inbound::http::health::HealthState;
use applicant_backend::outbound::persistence::{DbPool, run_pending_migrations};
use applicant_backend::settings::AppSettings;
use server::{CountriesConfig, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    color_eyre::install()?;

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr, settings.validation_policy()?);

    if let Some(pool_config) = settings.pool_config() {
        let applied = run_pending_migrations(pool_config.database_url().to_owned())
            .await
            .wrap_err("database migrations failed")?;
        info!(applied, "database migrations complete");
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    if settings.countries_enabled {
        config = config.with_countries(CountriesConfig::new(
            settings.countries_base_url()?,
            settings.countries_timeout(),
            settings.countries_cache_ttl(),
        ));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    info!(%bind_addr, "applicant backend listening");
    server.await.wrap_err("server terminated abnormally")
}
