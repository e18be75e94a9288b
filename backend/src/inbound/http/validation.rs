//! Boundary parsing shared by the HTTP handlers.
//!
//! Extractor failures and malformed scalar values become [`Error`] payloads
//! with `details.field` and `details.code`, matching what the pipelines
//! report for rule violations.

use actix_web::{HttpRequest, error::JsonPayloadError, error::PathError, error::QueryPayloadError, web};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::json;

use crate::domain::{Error, RowVersion};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidTimestamp,
    InvalidRowVersion,
    InvalidIdentifier,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidRowVersion => "invalid_row_version",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
        }
    }
}

/// Which end of an inclusive range a date-only value denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayBound {
    Start,
    End,
}

fn field_error(field: &str, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str, label: &str) -> Error {
    field_error(field, ErrorCode::MissingField, format!("{label} is required"))
}

pub(crate) fn id_mismatch_error() -> Error {
    field_error(
        "id",
        ErrorCode::InvalidIdentifier,
        "Applicant ID in the body does not match the URL",
    )
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
///
/// A bare date denotes the first instant of that day, or its last instant
/// when `bound` is [`DayBound::End`].
pub(crate) fn parse_timestamp(
    field: &str,
    raw: &str,
    bound: DayBound,
) -> Result<DateTime<Utc>, Error> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        Error::invalid_request(format!(
            "{field} must be an RFC 3339 timestamp or a YYYY-MM-DD date"
        ))
        .with_details(json!({
            "field": field,
            "value": trimmed,
            "code": ErrorCode::InvalidTimestamp.as_str(),
        }))
    })?;
    let time = match bound {
        DayBound::Start => NaiveTime::MIN,
        DayBound::End => {
            NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
        }
    };
    Ok(day.and_time(time).and_utc())
}

pub(crate) fn parse_optional_timestamp(
    field: &str,
    raw: Option<&str>,
    bound: DayBound,
) -> Result<Option<DateTime<Utc>>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(field, value, bound).map(Some),
    }
}

/// Decode a hex row version.
pub(crate) fn parse_row_version(raw: &str) -> Result<RowVersion, Error> {
    RowVersion::from_hex(raw).map_err(|_| {
        field_error(
            "rowVersion",
            ErrorCode::InvalidRowVersion,
            "Row version must be a hexadecimal string",
        )
    })
}

pub(crate) fn parse_optional_row_version(raw: Option<&str>) -> Result<Option<RowVersion>, Error> {
    raw.map(parse_row_version).transpose()
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    field_error(
        "body",
        ErrorCode::MalformedBody,
        format!("Request body is invalid: {err}"),
    )
    .into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    field_error(
        "query",
        ErrorCode::MalformedQuery,
        format!("Query string is invalid: {err}"),
    )
    .into()
}

fn path_error_handler(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    field_error("id", ErrorCode::InvalidIdentifier, "Invalid applicant ID").into()
}

/// Register extractor configs that render failures as [`Error`] JSON.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2024-05-01T10:30:00Z", DayBound::Start, (2024, 5, 1, 10, 30, 0))]
    #[case("2024-05-01T12:30:00+02:00", DayBound::End, (2024, 5, 1, 10, 30, 0))]
    #[case("2024-05-01", DayBound::Start, (2024, 5, 1, 0, 0, 0))]
    fn timestamps_accept_both_shapes(
        #[case] raw: &str,
        #[case] bound: DayBound,
        #[case] expected: (i32, u32, u32, u32, u32, u32),
    ) {
        let (y, mo, d, h, mi, s) = expected;
        let want = Utc
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .expect("valid timestamp");
        assert_eq!(parse_timestamp("appliedDate", raw, bound).expect("parsed"), want);
    }

    #[rstest]
    fn date_only_upper_bound_covers_the_whole_day() {
        let parsed = parse_timestamp("appliedTo", "2024-05-01", DayBound::End).expect("parsed");
        let next_midnight = Utc
            .with_ymd_and_hms(2024, 5, 2, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let last_millisecond = next_midnight - chrono::Duration::microseconds(500);
        assert!(parsed >= last_millisecond, "{parsed}");
        assert_eq!(next_midnight - parsed, chrono::Duration::nanoseconds(1));
    }

    #[rstest]
    fn malformed_timestamps_name_the_field() {
        let error = parse_timestamp("appliedFrom", "yesterday", DayBound::Start)
            .expect_err("not a date");
        assert_eq!(
            error.details(),
            Some(&json!({
                "field": "appliedFrom",
                "value": "yesterday",
                "code": "invalid_timestamp",
            }))
        );
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("  "), true)]
    #[case(Some("2024-01-31"), false)]
    fn blank_optional_timestamps_are_absent(#[case] raw: Option<&str>, #[case] absent: bool) {
        let parsed = parse_optional_timestamp("appliedFrom", raw, DayBound::Start).expect("parsed");
        assert_eq!(parsed.is_none(), absent);
    }

    #[rstest]
    fn row_versions_are_hex() {
        assert_eq!(
            parse_row_version("0a0B").expect("hex").as_bytes(),
            &[0x0a, 0x0b]
        );
        let error = parse_row_version("xyz").expect_err("not hex");
        assert_eq!(error.message(), "Row version must be a hexadecimal string");
    }
}
