//! Request and response shapes for the applicant endpoints.
//!
//! Request bodies tolerate missing text fields (they arrive as empty strings
//! and fail the pipeline's "is required" rules). Scalars that must be parsed
//! here, such as timestamps and row versions, fail at this boundary.

use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ListApplicants, SearchApplicants};
use crate::domain::{
    Applicant, ApplicantFields, CreateApplicant, DeleteApplicant, Error, UpdateApplicant,
};
use crate::inbound::http::validation::{
    DayBound, id_mismatch_error, missing_field_error, parse_optional_row_version,
    parse_optional_timestamp, parse_row_version, parse_timestamp,
};

/// Attribute values shared by create and update bodies.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantFieldsRequest {
    #[serde(default)]
    #[schema(example = "Jordan")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Smith-Jones")]
    pub family_name: String,
    #[serde(default)]
    #[schema(example = "12 Nile Street, Cairo")]
    pub address: String,
    #[serde(default)]
    #[schema(example = "jordan@example.com")]
    pub email_address: String,
    #[serde(default)]
    #[schema(example = "+201234567890")]
    pub phone: String,
    #[schema(example = 30)]
    pub age: Option<i32>,
    #[serde(default)]
    #[schema(example = "Egypt")]
    pub country_of_origin: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2024-05-01")]
    pub applied_date: Option<String>,
    #[serde(default)]
    pub hired: bool,
}

impl TryFrom<ApplicantFieldsRequest> for ApplicantFields {
    type Error = Error;

    fn try_from(value: ApplicantFieldsRequest) -> Result<Self, Self::Error> {
        let age = value.age.ok_or_else(|| missing_field_error("age", "Age"))?;
        let applied_date = match value.applied_date.as_deref().map(str::trim) {
            None | Some("") => return Err(missing_field_error("appliedDate", "Applied date")),
            Some(raw) => parse_timestamp("appliedDate", raw, DayBound::Start)?,
        };
        Ok(Self {
            name: value.name,
            family_name: value.family_name,
            address: value.address,
            email_address: value.email_address,
            phone: value.phone,
            age,
            country_of_origin: value.country_of_origin,
            applied_date,
            hired: value.hired,
        })
    }
}

/// Body of `POST /api/v1/applicants`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicantRequest {
    #[serde(flatten)]
    pub fields: ApplicantFieldsRequest,
}

impl TryFrom<CreateApplicantRequest> for CreateApplicant {
    type Error = Error;

    fn try_from(value: CreateApplicantRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            fields: value.fields.try_into()?,
        })
    }
}

/// Body of `PUT /api/v1/applicants/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicantRequest {
    /// Must equal the path identifier when present.
    pub id: Option<i64>,
    /// Hex token from the last read.
    #[schema(example = "9f1c2d")]
    pub row_version: Option<String>,
    #[serde(flatten)]
    pub fields: ApplicantFieldsRequest,
}

impl UpdateApplicantRequest {
    /// Build the command for the record at `path_id`.
    ///
    /// # Errors
    /// Returns an invalid-request [`Error`] when the body names a different
    /// record or carries a malformed field.
    pub fn into_command(self, path_id: i64) -> Result<UpdateApplicant, Error> {
        if self.id.is_some_and(|body_id| body_id != path_id) {
            return Err(id_mismatch_error());
        }
        Ok(UpdateApplicant {
            id: path_id,
            row_version: parse_optional_row_version(self.row_version.as_deref())?,
            fields: self.fields.try_into()?,
        })
    }
}

/// Query of `DELETE /api/v1/applicants/{id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteApplicantQuery {
    /// Hex token from the last read.
    pub row_version: Option<String>,
    /// Remove the row instead of flagging it.
    pub hard_delete: Option<bool>,
    /// Required for hard deletes.
    pub reason: Option<String>,
}

impl DeleteApplicantQuery {
    /// Build the command for the record at `path_id`.
    ///
    /// # Errors
    /// Returns an invalid-request [`Error`] when `rowVersion` is missing or
    /// not hex.
    pub fn into_command(self, path_id: i64) -> Result<DeleteApplicant, Error> {
        let raw = self
            .row_version
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or_else(|| missing_field_error("rowVersion", "Row version"))?;
        Ok(DeleteApplicant {
            id: path_id,
            row_version: Some(parse_row_version(raw)?),
            hard_delete: self.hard_delete.unwrap_or(false),
            reason: self.reason,
        })
    }
}

/// Query of `GET /api/v1/applicants`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListApplicantsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search_term: Option<String>,
}

impl From<ListApplicantsQuery> for ListApplicants {
    fn from(value: ListApplicantsQuery) -> Self {
        Self {
            page: value.page,
            page_size: value.page_size,
            search_term: value.search_term,
            ..Self::default()
        }
    }
}

/// Query of `GET /api/v1/applicants/search`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchApplicantsQuery {
    /// Required needle.
    pub query: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl From<SearchApplicantsQuery> for SearchApplicants {
    fn from(value: SearchApplicantsQuery) -> Self {
        Self {
            query: value.query.unwrap_or_default(),
            page: value.page,
            page_size: value.page_size,
        }
    }
}

/// Query of `GET /api/v1/applicants/filter`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FilterApplicantsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search_term: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub country: Option<String>,
    pub hired: Option<bool>,
    /// Inclusive; RFC 3339 or `YYYY-MM-DD`.
    pub applied_from: Option<String>,
    /// Inclusive; a bare date covers the whole day.
    pub applied_to: Option<String>,
    /// One of name, familyName, age, appliedDate, countryOfOrigin, email, id.
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub include_deleted: Option<bool>,
}

impl TryFrom<FilterApplicantsQuery> for ListApplicants {
    type Error = Error;

    fn try_from(value: FilterApplicantsQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            page: value.page,
            page_size: value.page_size,
            search_term: value.search_term,
            min_age: value.min_age,
            max_age: value.max_age,
            country: value.country,
            hired: value.hired,
            applied_from: parse_optional_timestamp(
                "appliedFrom",
                value.applied_from.as_deref(),
                DayBound::Start,
            )?,
            applied_to: parse_optional_timestamp(
                "appliedTo",
                value.applied_to.as_deref(),
                DayBound::End,
            )?,
            sort_by: value.sort_by,
            sort_descending: value.sort_descending.unwrap_or(false),
            include_deleted: value.include_deleted.unwrap_or(false),
        })
    }
}

/// Applicant as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantResponse {
    pub id: i64,
    pub name: String,
    pub family_name: String,
    pub address: String,
    pub email_address: String,
    pub phone: String,
    pub age: i32,
    pub country_of_origin: String,
    pub applied_date: DateTime<Utc>,
    pub hired: bool,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub created_by: String,
    pub last_modified_by: Option<String>,
    pub is_deleted: bool,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_reason: Option<String>,
    /// Lowercase hex concurrency token.
    pub row_version: Option<String>,
}

impl From<Applicant> for ApplicantResponse {
    fn from(value: Applicant) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            family_name: value.family_name,
            address: value.address,
            email_address: value.email_address,
            phone: value.phone,
            age: value.age,
            country_of_origin: value.country_of_origin,
            applied_date: value.applied_date,
            hired: value.hired,
            created_date: value.created_date,
            last_modified_date: value.last_modified_date,
            created_by: value.created_by,
            last_modified_by: value.last_modified_by,
            is_deleted: value.is_deleted,
            deleted_date: value.deleted_date,
            deleted_reason: value.deleted_reason,
            row_version: value.row_version.map(|token| token.to_string()),
        }
    }
}

/// One page of applicants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantPageResponse {
    pub items: Vec<ApplicantResponse>,
    pub total_count: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl From<Page<Applicant>> for ApplicantPageResponse {
    fn from(value: Page<Applicant>) -> Self {
        let page = value.map(ApplicantResponse::from);
        Self {
            items: page.items,
            total_count: page.total_count,
            current_page: page.current_page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            has_previous_page: page.has_previous_page,
            has_next_page: page.has_next_page,
        }
    }
}

/// Body of a successful create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Country as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CountryResponse {
    #[schema(example = "Egypt")]
    pub name: String,
    #[schema(example = "EG")]
    pub code: String,
    #[schema(example = "Africa")]
    pub region: String,
}

impl From<crate::domain::ports::Country> for CountryResponse {
    fn from(value: crate::domain::ports::Country) -> Self {
        Self {
            name: value.name,
            code: value.code,
            region: value.region,
        }
    }
}
