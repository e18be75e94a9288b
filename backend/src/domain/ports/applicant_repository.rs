//! Port for applicant persistence.
//!
//! Reads that do not mutate go straight through [`ApplicantRepository`].
//! Mutations run inside an explicit [`ApplicantUnitOfWork`] obtained from
//! [`ApplicantRepository::begin`]; writes become visible only on
//! [`ApplicantUnitOfWork::commit`]. Dropping a unit of work without
//! committing discards its writes, so a cancelled pipeline future leaves the
//! store untouched.

use std::cmp::Ordering;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::{Applicant, ApplicantId, NewApplicant};

use super::define_port_error;

define_port_error! {
    /// Errors raised by applicant store adapters.
    pub enum ApplicantRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "applicant store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "applicant store query failed: {message}",
        /// The stored concurrency token differs from the presented one.
        RevisionMismatch { id: i64 } => "applicant {id} was modified concurrently",
        /// The record targeted by a write does not exist.
        NotFound { id: i64 } => "applicant {id} does not exist",
        /// A live record already holds the email address being written.
        DuplicateEmail => "email address already in use",
        /// Transaction handle used out of order.
        TransactionState { message: String } => "transaction state error: {message}",
    }
}

/// Data predicate over applicant records.
///
/// All populated criteria must hold. `search_term` matches when it is a
/// case-insensitive substring of any of name, family name, email, address,
/// phone or country.
///
/// # Examples
/// ```
/// use applicant_backend::domain::ports::ApplicantFilter;
///
/// let filter = ApplicantFilter::default().with_email("Someone@Example.com", None);
/// assert_eq!(filter.email_equals.as_deref(), Some("someone@example.com"));
/// assert!(!filter.include_deleted);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantFilter {
    /// Also match soft-deleted records.
    pub include_deleted: bool,
    /// Free-text needle.
    pub search_term: Option<String>,
    /// Exact email, compared case-insensitively.
    pub email_equals: Option<String>,
    /// Record to leave out, used by uniqueness checks on update.
    pub exclude_id: Option<ApplicantId>,
    /// Inclusive lower age bound.
    pub min_age: Option<i32>,
    /// Inclusive upper age bound.
    pub max_age: Option<i32>,
    /// Exact country, compared case-insensitively.
    pub country: Option<String>,
    /// Hiring status.
    pub hired: Option<bool>,
    /// Inclusive lower bound on the application timestamp.
    pub applied_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the application timestamp.
    pub applied_to: Option<DateTime<Utc>>,
}

impl ApplicantFilter {
    /// Restrict to a single email, optionally ignoring one record.
    #[must_use]
    pub fn with_email(mut self, email: &str, exclude_id: Option<ApplicantId>) -> Self {
        self.email_equals = Some(email.trim().to_lowercase());
        self.exclude_id = exclude_id;
        self
    }

    /// Evaluate the predicate against one record.
    #[must_use]
    pub fn matches(&self, applicant: &Applicant) -> bool {
        if applicant.is_deleted && !self.include_deleted {
            return false;
        }
        if self.exclude_id == Some(applicant.id) {
            return false;
        }
        if self
            .email_equals
            .as_deref()
            .is_some_and(|email| !applicant.email_address.eq_ignore_ascii_case(email))
        {
            return false;
        }
        if self
            .search_term
            .as_deref()
            .is_some_and(|term| !matches_search_term(applicant, term))
        {
            return false;
        }
        if self.min_age.is_some_and(|min| applicant.age < min)
            || self.max_age.is_some_and(|max| applicant.age > max)
        {
            return false;
        }
        if self
            .country
            .as_deref()
            .is_some_and(|country| !applicant.country_of_origin.eq_ignore_ascii_case(country))
        {
            return false;
        }
        if self.hired.is_some_and(|hired| applicant.hired != hired) {
            return false;
        }
        if self.applied_from.is_some_and(|from| applicant.applied_date < from)
            || self.applied_to.is_some_and(|to| applicant.applied_date > to)
        {
            return false;
        }
        true
    }
}

fn matches_search_term(applicant: &Applicant, term: &str) -> bool {
    let needle = term.to_lowercase();
    [
        &applicant.name,
        &applicant.family_name,
        &applicant.email_address,
        &applicant.address,
        &applicant.phone,
        &applicant.country_of_origin,
    ]
    .into_iter()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Sortable columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Given name.
    Name,
    /// Family name.
    FamilyName,
    /// Age.
    Age,
    /// Application timestamp.
    AppliedDate,
    /// Country of origin.
    CountryOfOrigin,
    /// Email address.
    Email,
    /// Identifier.
    #[default]
    Id,
}

/// Raised for sort keys outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sort field: {0}")]
pub struct InvalidSortField(pub String);

impl FromStr for SortField {
    type Err = InvalidSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "familyname" => Ok(Self::FamilyName),
            "age" => Ok(Self::Age),
            "applieddate" => Ok(Self::AppliedDate),
            "countryoforigin" => Ok(Self::CountryOfOrigin),
            "email" => Ok(Self::Email),
            "id" => Ok(Self::Id),
            _ => Err(InvalidSortField(s.to_owned())),
        }
    }
}

/// Result ordering. Ties fall back to ascending identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOrder {
    /// Primary key.
    pub field: SortField,
    /// Reverse the primary key.
    pub descending: bool,
}

impl SortOrder {
    /// Compare two records under this ordering.
    #[must_use]
    pub fn compare(&self, left: &Applicant, right: &Applicant) -> Ordering {
        let primary = match self.field {
            SortField::Name => left.name.cmp(&right.name),
            SortField::FamilyName => left.family_name.cmp(&right.family_name),
            SortField::Age => left.age.cmp(&right.age),
            SortField::AppliedDate => left.applied_date.cmp(&right.applied_date),
            SortField::CountryOfOrigin => left.country_of_origin.cmp(&right.country_of_origin),
            SortField::Email => left.email_address.cmp(&right.email_address),
            SortField::Id => left.id.cmp(&right.id),
        };
        let primary = if self.descending {
            primary.reverse()
        } else {
            primary
        };
        primary.then_with(|| left.id.cmp(&right.id))
    }
}

/// Slice of an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Records to skip.
    pub offset: u64,
    /// Maximum records to return.
    pub limit: u32,
}

impl From<PageRequest> for PageWindow {
    fn from(request: PageRequest) -> Self {
        Self {
            offset: request.offset(),
            limit: request.page_size(),
        }
    }
}

/// Store contract for applicant records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    /// Open a transaction handle.
    async fn begin(&self) -> Result<Box<dyn ApplicantUnitOfWork>, ApplicantRepositoryError>;

    /// Fetch a record by identifier, deleted or not.
    async fn find_by_id(
        &self,
        id: ApplicantId,
    ) -> Result<Option<Applicant>, ApplicantRepositoryError>;

    /// Fetch one ordered window of matching records.
    async fn find_matching(
        &self,
        filter: &ApplicantFilter,
        order: SortOrder,
        window: PageWindow,
    ) -> Result<Vec<Applicant>, ApplicantRepositoryError>;

    /// Count every matching record.
    async fn count_matching(&self, filter: &ApplicantFilter)
    -> Result<u64, ApplicantRepositoryError>;
}

/// Transaction handle over the applicant store.
#[async_trait]
pub trait ApplicantUnitOfWork: Send {
    /// Fetch a record by identifier, seeing writes staged in this handle.
    async fn find_by_id(
        &mut self,
        id: ApplicantId,
    ) -> Result<Option<Applicant>, ApplicantRepositoryError>;

    /// Count matching records, seeing writes staged in this handle.
    async fn count_matching(
        &mut self,
        filter: &ApplicantFilter,
    ) -> Result<u64, ApplicantRepositoryError>;

    /// Insert a record, assigning its identifier and first token.
    ///
    /// Stores that enforce email uniqueness themselves report a clash as
    /// [`ApplicantRepositoryError::DuplicateEmail`].
    async fn insert(&mut self, record: NewApplicant) -> Result<Applicant, ApplicantRepositoryError>;

    /// Overwrite a record and regenerate its token.
    ///
    /// Fails with [`ApplicantRepositoryError::RevisionMismatch`] when the
    /// stored token differs from `record.row_version`, and with
    /// [`ApplicantRepositoryError::DuplicateEmail`] like
    /// [`ApplicantUnitOfWork::insert`].
    async fn update(&mut self, record: &Applicant) -> Result<Applicant, ApplicantRepositoryError>;

    /// Physically remove a record, under the same token check as
    /// [`ApplicantUnitOfWork::update`].
    async fn delete(&mut self, record: &Applicant) -> Result<(), ApplicantRepositoryError>;

    /// Publish staged writes.
    async fn commit(self: Box<Self>) -> Result<(), ApplicantRepositoryError>;

    /// Discard staged writes.
    async fn rollback(self: Box<Self>) -> Result<(), ApplicantRepositoryError>;
}

#[cfg(test)]
#[path = "applicant_repository_tests.rs"]
mod tests;
