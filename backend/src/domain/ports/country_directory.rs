//! Port for the external country directory.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised when listing countries.
    pub enum CountryDirectoryError {
        /// The directory could not be reached.
        Transport { message: String } => "country directory request failed: {message}",
        /// The directory answered with an unexpected status.
        Status { status: u16 } => "country directory returned status {status}",
        /// The directory answered with an unreadable body.
        Decode { message: String } => "country directory response was malformed: {message}",
    }
}

/// Outcome of checking a name against the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryVerdict {
    /// The directory knows the name.
    Recognised,
    /// The directory positively does not know the name.
    Unrecognised,
    /// The directory could not answer.
    Unknown,
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// Common name.
    pub name: String,
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    /// Geographic region.
    pub region: String,
}

/// Country lookup and listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountryDirectory: Send + Sync {
    /// Check a name. Lookup failures yield [`CountryVerdict::Unknown`].
    async fn verify(&self, name: &str) -> CountryVerdict;

    /// List every known country.
    async fn list(&self) -> Result<Vec<Country>, CountryDirectoryError>;
}

/// Offline directory: recognises every name and lists nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCountryDirectory;

#[async_trait]
impl CountryDirectory for FixtureCountryDirectory {
    async fn verify(&self, _name: &str) -> CountryVerdict {
        CountryVerdict::Recognised
    }

    async fn list(&self) -> Result<Vec<Country>, CountryDirectoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_recognises_everything_and_lists_nothing() {
        let directory = FixtureCountryDirectory;
        assert_eq!(directory.verify("Atlantis").await, CountryVerdict::Recognised);
        assert!(directory.list().await.expect("fixture list").is_empty());
    }
}
