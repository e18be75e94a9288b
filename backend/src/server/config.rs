//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use applicant_backend::domain::ValidationPolicy;
use applicant_backend::outbound::persistence::DbPool;
use url::Url;

/// Where and how to reach the REST country directory.
#[derive(Debug, Clone)]
pub struct CountriesConfig {
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) cache_ttl: Duration,
}

impl CountriesConfig {
    #[must_use]
    pub fn new(base_url: Url, timeout: Duration, cache_ttl: Duration) -> Self {
        Self {
            base_url,
            timeout,
            cache_ttl,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) policy: ValidationPolicy,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) countries: Option<CountriesConfig>,
}

impl ServerConfig {
    /// Configuration using the in-memory store and the offline directory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, policy: ValidationPolicy) -> Self {
        Self {
            bind_addr,
            policy,
            db_pool: None,
            countries: None,
        }
    }

    /// Persist applicants in PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Verify countries against the REST directory.
    #[must_use]
    pub fn with_countries(mut self, countries: CountriesConfig) -> Self {
        self.countries = Some(countries);
        self
    }
}
