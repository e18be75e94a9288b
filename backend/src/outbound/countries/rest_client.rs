//! Reqwest-backed country directory adapter.
//!
//! Transport concerns only: URL building, timeouts, status mapping and JSON
//! decoding. Verification never fails; an unreachable directory answers
//! [`CountryVerdict::Unknown`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::warn;

use super::dto::{CountryDto, into_domain_countries};
use crate::domain::ports::{Country, CountryDirectory, CountryDirectoryError, CountryVerdict};

const LIST_FIELDS: &str = "name,cca2,region";
const PREVIEW_CHAR_LIMIT: usize = 160;

/// Country directory backed by a REST Countries v3.1 style endpoint.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    client: Client,
    base_url: Url,
}

impl RestCountriesClient {
    /// Build a client rooted at `base_url` with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CountryDirectoryError> {
        endpoint(&self.base_url, segments)
    }

    async fn fetch(&self, url: Url) -> Result<(StatusCode, Vec<u8>), CountryDirectoryError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }

    async fn lookup(&self, name: &str) -> Result<CountryVerdict, CountryDirectoryError> {
        let mut url = self.endpoint(&["name", name])?;
        url.query_pairs_mut().append_pair("fullText", "true");
        let (status, body) = self.fetch(url).await?;
        verdict_for(status, &body)
    }
}

#[async_trait]
impl CountryDirectory for RestCountriesClient {
    async fn verify(&self, name: &str) -> CountryVerdict {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return CountryVerdict::Unrecognised;
        }
        self.lookup(trimmed).await.unwrap_or_else(|error| {
            warn!(country = trimmed, %error, "country verification unavailable");
            CountryVerdict::Unknown
        })
    }

    async fn list(&self) -> Result<Vec<Country>, CountryDirectoryError> {
        let mut url = self.endpoint(&["all"])?;
        url.query_pairs_mut().append_pair("fields", LIST_FIELDS);
        let (status, body) = self.fetch(url).await?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        parse_countries(&body)
    }
}

/// Append escaped path segments to `base`, tolerating a trailing slash.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, CountryDirectoryError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| CountryDirectoryError::transport(format!("base URL {base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn verdict_for(status: StatusCode, body: &[u8]) -> Result<CountryVerdict, CountryDirectoryError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(CountryVerdict::Unrecognised);
    }
    if !status.is_success() {
        return Err(map_status_error(status, body));
    }
    let matches: Vec<CountryDto> = serde_json::from_slice(body)
        .map_err(|error| CountryDirectoryError::decode(error.to_string()))?;
    Ok(if matches.is_empty() {
        CountryVerdict::Unrecognised
    } else {
        CountryVerdict::Recognised
    })
}

fn parse_countries(body: &[u8]) -> Result<Vec<Country>, CountryDirectoryError> {
    let entries: Vec<CountryDto> = serde_json::from_slice(body)
        .map_err(|error| CountryDirectoryError::decode(format!("invalid country listing: {error}")))?;
    Ok(into_domain_countries(entries))
}

fn map_transport_error(error: reqwest::Error) -> CountryDirectoryError {
    if error.is_timeout() {
        CountryDirectoryError::transport(format!("timed out: {error}"))
    } else {
        CountryDirectoryError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CountryDirectoryError {
    let preview = body_preview(body);
    if !preview.is_empty() {
        warn!(status = status.as_u16(), body = %preview, "country directory rejected request");
    }
    CountryDirectoryError::status(status.as_u16())
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Offline coverage for URL building and response mapping.
    use super::*;
    use rstest::rstest;

    fn base(raw: &str) -> Url {
        Url::parse(raw).expect("valid base URL")
    }

    #[rstest]
    #[case("https://restcountries.com/v3.1", "https://restcountries.com/v3.1/name/Egypt")]
    #[case("https://restcountries.com/v3.1/", "https://restcountries.com/v3.1/name/Egypt")]
    fn endpoint_appends_segments(#[case] root: &str, #[case] expected: &str) {
        let url = endpoint(&base(root), &["name", "Egypt"]).expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn endpoint_escapes_names() {
        let url = endpoint(&base("https://example.test/v3.1"), &["name", "Côte d/Ivoire"])
            .expect("endpoint");
        assert_eq!(url.path(), "/v3.1/name/C%C3%B4te%20d%2FIvoire");
    }

    #[rstest]
    fn endpoint_rejects_opaque_bases() {
        let error = endpoint(&base("mailto:ops@example.test"), &["all"]).expect_err("opaque");
        assert!(matches!(error, CountryDirectoryError::Transport { .. }));
    }

    #[rstest]
    #[case::found(StatusCode::OK, r#"[{"name":{"common":"Egypt"}}]"#, CountryVerdict::Recognised)]
    #[case::empty(StatusCode::OK, "[]", CountryVerdict::Unrecognised)]
    #[case::missing(StatusCode::NOT_FOUND, r#"{"status":404}"#, CountryVerdict::Unrecognised)]
    fn verdicts_follow_status_and_body(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected: CountryVerdict,
    ) {
        assert_eq!(verdict_for(status, body.as_bytes()).expect("verdict"), expected);
    }

    #[rstest]
    fn server_errors_do_not_produce_a_verdict() {
        let error = verdict_for(StatusCode::BAD_GATEWAY, b"upstream down").expect_err("5xx");
        assert_eq!(error, CountryDirectoryError::status(502_u16));
    }

    #[rstest]
    fn listing_is_decoded_sorted_and_defaulted() {
        let body = br#"[
            {"name":{"common":"Kenya"},"cca2":"ke","region":"Africa"},
            {"name":{"common":"Egypt"},"cca2":"EG"},
            {"name":{"common":"  "},"cca2":"XX","region":"Nowhere"}
        ]"#;
        let countries = parse_countries(body).expect("listing");
        assert_eq!(
            countries,
            vec![
                Country {
                    name: "Egypt".to_owned(),
                    code: "EG".to_owned(),
                    region: "Unknown".to_owned(),
                },
                Country {
                    name: "Kenya".to_owned(),
                    code: "KE".to_owned(),
                    region: "Africa".to_owned(),
                },
            ]
        );
    }

    #[rstest]
    fn malformed_listing_is_a_decode_error() {
        let error = parse_countries(b"{\"oops\":true}").expect_err("not an array");
        assert!(matches!(error, CountryDirectoryError::Decode { .. }));
    }

    #[rstest]
    fn body_preview_compacts_and_truncates() {
        let long = format!("a  b\n{}", "c".repeat(200));
        let preview = body_preview(long.as_bytes());
        assert!(preview.starts_with("a b c"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
    }
}
