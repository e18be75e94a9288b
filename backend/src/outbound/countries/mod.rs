//! Country directory adapters.
//!
//! [`RestCountriesClient`] talks to a REST Countries compatible service and
//! [`CachedCountryDirectory`] keeps its listing for a configurable interval.

mod cached;
mod dto;
mod rest_client;

pub use cached::CachedCountryDirectory;
pub use rest_client::RestCountriesClient;
