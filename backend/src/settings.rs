//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `APPLICANTS_*` environment variables and
//! configuration files, in that order of precedence.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{AgeBounds, CountryPolicy, InvalidAgeBounds, ValidationPolicy};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_COUNTRIES_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Raised when loaded values cannot be turned into runtime configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid host address {host:?}")]
    Host { host: String },
    #[error("invalid country directory URL {url:?}: {source}")]
    CountriesUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid {which} age bounds: {source}")]
    AgeBounds {
        which: &'static str,
        #[source]
        source: InvalidAgeBounds,
    },
}

/// Settings controlling the applicant backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APPLICANTS")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection string. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Verify countries against the REST directory.
    #[ortho_config(default = false)]
    pub countries_enabled: bool,
    /// Base URL of the REST country directory.
    pub countries_base_url: Option<String>,
    #[ortho_config(default = 10)]
    pub countries_timeout_secs: u64,
    #[ortho_config(default = 3600)]
    pub countries_cache_ttl_secs: u64,
    #[ortho_config(default = 18)]
    pub business_min_age: i32,
    #[ortho_config(default = 65)]
    pub business_max_age: i32,
    #[ortho_config(default = 20)]
    pub schema_min_age: i32,
    #[ortho_config(default = 60)]
    pub schema_max_age: i32,
    /// Reject writes when the directory cannot answer.
    #[ortho_config(default = false)]
    pub reject_unknown_country: bool,
}

impl AppSettings {
    /// Configured host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Socket address the server binds to.
    ///
    /// # Errors
    /// Returns [`SettingsError::Host`] when the host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host();
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::Host {
            host: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Country directory base URL.
    ///
    /// # Errors
    /// Returns [`SettingsError::CountriesUrl`] when the value does not parse.
    pub fn countries_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .countries_base_url
            .as_deref()
            .unwrap_or(DEFAULT_COUNTRIES_BASE_URL);
        Url::parse(raw).map_err(|source| SettingsError::CountriesUrl {
            url: raw.to_owned(),
            source,
        })
    }

    pub fn countries_timeout(&self) -> Duration {
        Duration::from_secs(self.countries_timeout_secs)
    }

    pub fn countries_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.countries_cache_ttl_secs)
    }

    /// Validation policy derived from the age and country settings.
    ///
    /// # Errors
    /// Returns [`SettingsError::AgeBounds`] when a minimum exceeds its maximum.
    pub fn validation_policy(&self) -> Result<ValidationPolicy, SettingsError> {
        let schema_age = AgeBounds::new(self.schema_min_age, self.schema_max_age)
            .map_err(|source| SettingsError::AgeBounds {
                which: "schema",
                source,
            })?;
        let business_age = AgeBounds::new(self.business_min_age, self.business_max_age)
            .map_err(|source| SettingsError::AgeBounds {
                which: "business",
                source,
            })?;
        Ok(ValidationPolicy {
            schema_age,
            business_age,
            country: CountryPolicy {
                reject_unknown: self.reject_unknown_country,
                ..CountryPolicy::default()
            },
        })
    }

    /// Pool configuration, when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url
            .as_deref()
            .map(|url| PoolConfig::new(url).with_max_size(self.db_max_connections))
    }
}
