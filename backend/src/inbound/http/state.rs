//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be tested with in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{ApplicantCommand, ApplicantQuery, CountryDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub commands: Arc<dyn ApplicantCommand>,
    pub queries: Arc<dyn ApplicantQuery>,
    pub countries: Arc<dyn CountryDirectory>,
}

impl HttpState {
    /// Bundle the ports used by the handlers.
    pub fn new(
        commands: Arc<dyn ApplicantCommand>,
        queries: Arc<dyn ApplicantQuery>,
        countries: Arc<dyn CountryDirectory>,
    ) -> Self {
        Self {
            commands,
            queries,
            countries,
        }
    }
}
