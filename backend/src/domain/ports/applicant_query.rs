//! Driving port for applicant reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::Page;

use crate::domain::{Applicant, ApplicantError};

/// Options for a filtered listing.
///
/// Every criterion is optional. Defaults: page 1, 50 per page, sorted by
/// ascending identifier, soft-deleted records hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListApplicants {
    /// 1-based page number, clamped to the supported range.
    pub page: Option<i64>,
    /// Page size, clamped to the supported range.
    pub page_size: Option<i64>,
    /// Free-text needle.
    pub search_term: Option<String>,
    /// Inclusive lower age bound.
    pub min_age: Option<i32>,
    /// Inclusive upper age bound.
    pub max_age: Option<i32>,
    /// Exact country of origin.
    pub country: Option<String>,
    /// Hiring status.
    pub hired: Option<bool>,
    /// Inclusive lower bound on the application timestamp.
    pub applied_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the application timestamp.
    pub applied_to: Option<DateTime<Utc>>,
    /// Sort key from the allow-list.
    pub sort_by: Option<String>,
    /// Reverse the sort key.
    pub sort_descending: bool,
    /// Also return soft-deleted records.
    pub include_deleted: bool,
}

/// Free-text search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchApplicants {
    /// Needle matched against the text fields.
    pub query: String,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size.
    pub page_size: Option<i64>,
}

/// Use-case port for reading applicants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicantQuery: Send + Sync {
    /// Fetch a live applicant. Soft-deleted records are reported as absent.
    async fn get(&self, id: i64) -> Result<Option<Applicant>, ApplicantError>;

    /// List applicants matching `options`.
    async fn list(&self, options: ListApplicants) -> Result<Page<Applicant>, ApplicantError>;

    /// Search live applicants by free text.
    async fn search(&self, request: SearchApplicants)
    -> Result<Page<Applicant>, ApplicantError>;
}
