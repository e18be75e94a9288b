//! Wire shapes returned by the REST Countries service.

use serde::Deserialize;

use crate::domain::ports::Country;

const UNKNOWN_REGION: &str = "Unknown";

#[derive(Debug, Deserialize)]
pub(super) struct CountryDto {
    pub(super) name: CountryNameDto,
    #[serde(default)]
    pub(super) cca2: String,
    #[serde(default)]
    pub(super) region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CountryNameDto {
    pub(super) common: String,
}

impl CountryDto {
    pub(super) fn into_domain_country(self) -> Option<Country> {
        let name = self.name.common.trim().to_owned();
        if name.is_empty() {
            return None;
        }
        let region = self
            .region
            .map(|region| region.trim().to_owned())
            .filter(|region| !region.is_empty())
            .unwrap_or_else(|| UNKNOWN_REGION.to_owned());
        Some(Country {
            name,
            code: self.cca2.trim().to_uppercase(),
            region,
        })
    }
}

/// Decode a listing, dropping entries without a usable name, sorted by name.
pub(super) fn into_domain_countries(entries: Vec<CountryDto>) -> Vec<Country> {
    let mut countries: Vec<Country> = entries
        .into_iter()
        .filter_map(CountryDto::into_domain_country)
        .collect();
    countries.sort_by(|left, right| left.name.cmp(&right.name));
    countries
}
