//! Applicant query pipeline: lookups, filtered listings and search.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    ApplicantAuditLog, ApplicantFilter, ApplicantQuery, ApplicantRepository, InvalidSortField,
    ListApplicants, SearchApplicants, SortField, SortOrder,
};
use crate::domain::security::{is_sql_injection_attempt_allowing, is_xss_attempt, sanitize_input};
use crate::domain::validation::NAME_ADMITTED;
use crate::domain::{Applicant, ApplicantError, ApplicantId, AuditEvent, AuditOperation};

/// Longest accepted search term, in characters.
pub const MAX_SEARCH_TERM_LENGTH: usize = 100;
/// Longest accepted country filter, in characters.
pub const MAX_COUNTRY_FILTER_LENGTH: usize = 50;
/// Inclusive range accepted for age filter bounds.
pub const AGE_FILTER_RANGE: std::ops::RangeInclusive<i32> = 0..=150;

/// Applicant service implementing the [`ApplicantQuery`] driving port.
pub struct ApplicantQueryService<R: ?Sized, A: ?Sized> {
    repository: Arc<R>,
    audit: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized, A: ?Sized> ApplicantQueryService<R, A> {
    /// Create a query service over `repository`.
    pub fn new(repository: Arc<R>, audit: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            audit,
            clock,
        }
    }
}

impl<R, A> ApplicantQueryService<R, A>
where
    R: ApplicantRepository + ?Sized,
    A: ApplicantAuditLog + ?Sized,
{
    fn audited<T>(
        &self,
        operation: AuditOperation,
        id: Option<i64>,
        outcome: Result<T, ApplicantError>,
    ) -> Result<T, ApplicantError> {
        outcome.map_err(|error| {
            self.audit
                .record(&AuditEvent::for_failure(operation, id, &error));
            error
        })
    }

    async fn fetch_page(
        &self,
        options: ListApplicants,
        operation: AuditOperation,
    ) -> Result<Page<Applicant>, ApplicantError> {
        let request = PageRequest::clamped(options.page, options.page_size);
        let order = sort_order(&options)?;
        let filter = build_filter(options, self.clock.utc())?;

        let total = self
            .repository
            .count_matching(&filter)
            .await
            .map_err(|err| ApplicantError::system(err.to_string()))?;
        let items = self
            .repository
            .find_matching(&filter, order, request.into())
            .await
            .map_err(|err| ApplicantError::system(err.to_string()))?;

        self.audit.record(&AuditEvent::RecordsQueried {
            operation,
            returned: items.len(),
            total,
        });
        Ok(Page::new(items, total, request))
    }
}

fn sort_order(options: &ListApplicants) -> Result<SortOrder, ApplicantError> {
    let field = match options.sort_by.as_deref().map(str::trim) {
        None | Some("") => SortField::default(),
        Some(raw) => raw
            .parse()
            .map_err(|err: InvalidSortField| ApplicantError::validation("sortBy", err.to_string()))?,
    };
    Ok(SortOrder {
        field,
        descending: options.sort_descending,
    })
}

/// Validate and sanitise one free-text criterion. Blank values are dropped.
fn text_criterion(
    value: Option<String>,
    field: &str,
    label: &str,
    max_length: usize,
) -> Result<Option<String>, ApplicantError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_length {
        return Err(ApplicantError::validation(
            field,
            format!("{label} cannot exceed {max_length} characters"),
        ));
    }
    if is_sql_injection_attempt_allowing(trimmed, &NAME_ADMITTED) {
        return Err(ApplicantError::security(format!(
            "Potential SQL injection detected in {}",
            label.to_lowercase()
        )));
    }
    if is_xss_attempt(trimmed) {
        return Err(ApplicantError::security(format!(
            "Potential XSS attack detected in {}",
            label.to_lowercase()
        )));
    }
    Ok(Some(sanitize_input(trimmed)))
}

fn age_criterion(value: Option<i32>, field: &str, label: &str) -> Result<Option<i32>, ApplicantError> {
    match value {
        Some(age) if !AGE_FILTER_RANGE.contains(&age) => Err(ApplicantError::validation(
            field,
            format!(
                "{label} must be between {} and {}",
                AGE_FILTER_RANGE.start(),
                AGE_FILTER_RANGE.end()
            ),
        )),
        other => Ok(other),
    }
}

fn build_filter(options: ListApplicants, now: DateTime<Utc>) -> Result<ApplicantFilter, ApplicantError> {
    let search_term = text_criterion(
        options.search_term,
        "searchTerm",
        "Search term",
        MAX_SEARCH_TERM_LENGTH,
    )?;
    let country = text_criterion(
        options.country,
        "country",
        "Country filter",
        MAX_COUNTRY_FILTER_LENGTH,
    )?;
    let min_age = age_criterion(options.min_age, "minAge", "Minimum age")?;
    let max_age = age_criterion(options.max_age, "maxAge", "Maximum age")?;
    if matches!((min_age, max_age), (Some(min), Some(max)) if min > max) {
        return Err(ApplicantError::validation(
            "minAge",
            "Minimum age cannot be greater than maximum age",
        ));
    }
    if matches!(
        (options.applied_from, options.applied_to),
        (Some(from), Some(to)) if from > to
    ) {
        return Err(ApplicantError::validation(
            "appliedFrom",
            "Start date cannot be after end date",
        ));
    }
    if options.applied_from.is_some_and(|from| from > now) {
        return Err(ApplicantError::validation(
            "appliedFrom",
            "Start date cannot be in the future",
        ));
    }

    Ok(ApplicantFilter {
        include_deleted: options.include_deleted,
        search_term,
        email_equals: None,
        exclude_id: None,
        min_age,
        max_age,
        country,
        hired: options.hired,
        applied_from: options.applied_from,
        applied_to: options.applied_to,
    })
}

#[async_trait]
impl<R, A> ApplicantQuery for ApplicantQueryService<R, A>
where
    R: ApplicantRepository + ?Sized,
    A: ApplicantAuditLog + ?Sized,
{
    async fn get(&self, id: i64) -> Result<Option<Applicant>, ApplicantError> {
        let outcome = match ApplicantId::new(id) {
            Ok(id) => self
                .repository
                .find_by_id(id)
                .await
                .map(|found| found.filter(|record| !record.is_deleted))
                .map_err(|err| ApplicantError::system(err.to_string())),
            Err(_) => Err(ApplicantError::validation("id", "Invalid applicant ID")),
        };
        let found = self.audited(AuditOperation::Get, Some(id), outcome)?;
        self.audit.record(&AuditEvent::RecordsQueried {
            operation: AuditOperation::Get,
            returned: usize::from(found.is_some()),
            total: u64::from(found.is_some()),
        });
        Ok(found)
    }

    async fn list(&self, options: ListApplicants) -> Result<Page<Applicant>, ApplicantError> {
        let outcome = self.fetch_page(options, AuditOperation::List).await;
        self.audited(AuditOperation::List, None, outcome)
    }

    async fn search(&self, request: SearchApplicants) -> Result<Page<Applicant>, ApplicantError> {
        let outcome = if request.query.trim().is_empty() {
            Err(ApplicantError::validation("query", "Search query is required"))
        } else {
            let options = ListApplicants {
                page: request.page,
                page_size: request.page_size,
                search_term: Some(request.query),
                ..ListApplicants::default()
            };
            self.fetch_page(options, AuditOperation::Search).await
        };
        self.audited(AuditOperation::Search, None, outcome)
    }
}

#[cfg(test)]
#[path = "applicant_query_tests.rs"]
mod tests;
