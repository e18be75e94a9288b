//! Time-boxed cache in front of a country directory.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::ports::{Country, CountryDirectory, CountryDirectoryError, CountryVerdict};

#[derive(Debug, Clone)]
struct CachedListing {
    countries: Arc<Vec<Country>>,
    fetched_at: DateTime<Utc>,
}

/// Serves listings from memory for `ttl`, answering verification from a fresh
/// listing when one is held.
///
/// A stale listing is still returned when the refresh fails.
pub struct CachedCountryDirectory<D: ?Sized> {
    inner: Arc<D>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    listing: RwLock<Option<CachedListing>>,
}

impl<D: ?Sized> CachedCountryDirectory<D> {
    /// Wrap `inner`, keeping listings for `ttl`.
    pub fn new(inner: Arc<D>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            inner,
            clock,
            ttl,
            listing: RwLock::new(None),
        }
    }

    fn is_fresh(&self, listing: &CachedListing, now: DateTime<Utc>) -> bool {
        // A clock that moved backwards keeps the entry.
        (now - listing.fetched_at)
            .to_std()
            .map_or(true, |age| age < self.ttl)
    }

    async fn fresh_listing(&self) -> Option<Arc<Vec<Country>>> {
        let now = self.clock.utc();
        self.listing
            .read()
            .await
            .as_ref()
            .filter(|listing| self.is_fresh(listing, now))
            .map(|listing| Arc::clone(&listing.countries))
    }
}

#[async_trait]
impl<D> CountryDirectory for CachedCountryDirectory<D>
where
    D: CountryDirectory + ?Sized,
{
    async fn verify(&self, name: &str) -> CountryVerdict {
        match self.fresh_listing().await {
            Some(countries) if !countries.is_empty() => {
                let wanted = name.trim();
                if countries
                    .iter()
                    .any(|country| country.name.eq_ignore_ascii_case(wanted))
                {
                    CountryVerdict::Recognised
                } else {
                    CountryVerdict::Unrecognised
                }
            }
            _ => self.inner.verify(name).await,
        }
    }

    async fn list(&self) -> Result<Vec<Country>, CountryDirectoryError> {
        if let Some(countries) = self.fresh_listing().await {
            debug!(count = countries.len(), "serving cached country listing");
            return Ok(countries.as_ref().clone());
        }

        match self.inner.list().await {
            Ok(countries) => {
                *self.listing.write().await = Some(CachedListing {
                    countries: Arc::new(countries.clone()),
                    fetched_at: self.clock.utc(),
                });
                Ok(countries)
            }
            Err(error) => {
                let stale = self.listing.read().await.clone();
                match stale {
                    Some(listing) => {
                        warn!(%error, "country refresh failed; serving stale listing");
                        Ok(listing.countries.as_ref().clone())
                    }
                    None => Err(error),
                }
            }
        }
    }
}
