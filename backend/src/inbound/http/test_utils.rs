//! Shared fixtures for HTTP handler tests.

use std::sync::Arc;

use actix_web::{App, web};
use mockable::DefaultClock;

use crate::domain::ports::{ApplicantCommand, ApplicantQuery, CountryDirectory, FixtureCountryDirectory};
use crate::domain::{ApplicantQueryService, ApplicantService};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::configure_extractors;
use crate::middleware::Trace;
use crate::outbound::audit::TracingAuditLog;
use crate::outbound::memory::InMemoryApplicantRepository;

/// Handler state wired to the in-memory store, together with the store.
pub fn in_memory_state(
    countries: Arc<dyn CountryDirectory>,
) -> (HttpState, Arc<InMemoryApplicantRepository>) {
    let repository = Arc::new(InMemoryApplicantRepository::default());
    let audit = Arc::new(TracingAuditLog);
    let clock = Arc::new(DefaultClock);
    let commands: Arc<dyn ApplicantCommand> = Arc::new(ApplicantService::new(
        Arc::clone(&repository),
        Arc::clone(&countries),
        Arc::clone(&audit),
        clock.clone(),
    ));
    let queries: Arc<dyn ApplicantQuery> = Arc::new(ApplicantQueryService::new(
        Arc::clone(&repository),
        audit,
        clock,
    ));
    (HttpState::new(commands, queries, countries), repository)
}

/// Same as [`in_memory_state`] with the offline country directory.
pub fn fixture_state() -> (HttpState, Arc<InMemoryApplicantRepository>) {
    in_memory_state(Arc::new(FixtureCountryDirectory))
}

/// App exposing the given routes under `/api/v1` with extractor errors and
/// trace propagation configured as in production.
pub fn api_app(
    state: HttpState,
    routes: fn(&mut web::ServiceConfig),
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(configure_extractors)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(routes))
}
