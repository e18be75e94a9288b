//! Builders wiring the adapters selected by [`ServerConfig`] into handler
//! state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use applicant_backend::domain::ports::{
    ApplicantCommand, ApplicantQuery, ApplicantRepository, CountryDirectory,
    FixtureCountryDirectory,
};
use applicant_backend::domain::{ApplicantQueryService, ApplicantService};
use applicant_backend::inbound::http::state::HttpState;
use applicant_backend::outbound::audit::TracingAuditLog;
use applicant_backend::outbound::countries::{CachedCountryDirectory, RestCountriesClient};
use applicant_backend::outbound::memory::InMemoryApplicantRepository;
use applicant_backend::outbound::persistence::DieselApplicantRepository;

use super::ServerConfig;

fn build_repository(config: &ServerConfig) -> Arc<dyn ApplicantRepository> {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL applicant store");
            Arc::new(DieselApplicantRepository::new(pool.clone()))
        }
        None => {
            info!("no database configured; using in-memory applicant store");
            Arc::new(InMemoryApplicantRepository::default())
        }
    }
}

fn build_country_directory(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<Arc<dyn CountryDirectory>> {
    let Some(countries) = &config.countries else {
        return Ok(Arc::new(FixtureCountryDirectory));
    };
    let client = RestCountriesClient::new(countries.base_url.clone(), countries.timeout)
        .map_err(|err| std::io::Error::other(format!("country client setup failed: {err}")))?;
    info!(base_url = %countries.base_url, "verifying countries against REST directory");
    Ok(Arc::new(CachedCountryDirectory::new(
        Arc::new(client),
        clock,
        countries.cache_ttl,
    )))
}

/// Assemble the command and query pipelines over the configured adapters.
///
/// # Errors
/// Returns [`std::io::Error`] when the country client cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repository = build_repository(config);
    let countries = build_country_directory(config, Arc::clone(&clock))?;
    let audit = Arc::new(TracingAuditLog);

    let commands: Arc<dyn ApplicantCommand> = Arc::new(
        ApplicantService::new(
            Arc::clone(&repository),
            Arc::clone(&countries),
            Arc::clone(&audit),
            Arc::clone(&clock),
        )
        .with_policy(config.policy),
    );
    let queries: Arc<dyn ApplicantQuery> =
        Arc::new(ApplicantQueryService::new(repository, audit, clock));
    Ok(HttpState::new(commands, queries, countries))
}
