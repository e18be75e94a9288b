//! Internal Diesel row structs for the applicants table.
//!
//! Never exposed outside the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::applicants;
use crate::domain::{Applicant, ApplicantId, NewApplicant, RowVersion};

/// Row read from the applicants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applicants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicantRow {
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
    pub row_version: Vec<u8>,
}

impl ApplicantRow {
    /// Convert into the domain record, rejecting identifiers the domain
    /// cannot represent.
    pub(crate) fn into_domain(self) -> Result<Applicant, String> {
        let id = ApplicantId::new(self.id).map_err(|err| err.to_string())?;
        let row_version = (!self.row_version.is_empty()).then(|| RowVersion::new(self.row_version));
        Ok(Applicant {
            id,
            name: self.name,
            family_name: self.family_name,
            address: self.address,
            email_address: self.email_address,
            phone: self.phone,
            age: self.age,
            country_of_origin: self.country_of_origin,
            applied_date: self.applied_date,
            hired: self.hired,
            created_date: self.created_date,
            last_modified_date: self.last_modified_date,
            created_by: self.created_by,
            last_modified_by: self.last_modified_by,
            is_deleted: self.is_deleted,
            deleted_date: self.deleted_date,
            deleted_reason: self.deleted_reason,
            row_version,
        })
    }
}

/// Insertable applicant; the identifier comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applicants)]
pub(crate) struct NewApplicantRow<'a> {
    pub name: &'a str,
    pub family_name: &'a str,
    pub address: &'a str,
    pub email_address: &'a str,
    pub phone: &'a str,
    pub age: i32,
    pub country_of_origin: &'a str,
    pub applied_date: DateTime<Utc>,
    pub hired: bool,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub created_by: &'a str,
    pub last_modified_by: Option<&'a str>,
    pub is_deleted: bool,
    pub row_version: &'a [u8],
}

impl<'a> NewApplicantRow<'a> {
    pub(crate) fn from_domain(record: &'a NewApplicant, row_version: &'a RowVersion) -> Self {
        Self {
            name: &record.name,
            family_name: &record.family_name,
            address: &record.address,
            email_address: &record.email_address,
            phone: &record.phone,
            age: record.age,
            country_of_origin: &record.country_of_origin,
            applied_date: record.applied_date,
            hired: record.hired,
            created_date: record.created_date,
            last_modified_date: Some(record.last_modified_date),
            created_by: &record.created_by,
            last_modified_by: Some(&record.last_modified_by),
            is_deleted: false,
            row_version: row_version.as_bytes(),
        }
    }
}

/// Full replacement of the mutable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = applicants)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ApplicantChangeset<'a> {
    pub name: &'a str,
    pub family_name: &'a str,
    pub address: &'a str,
    pub email_address: &'a str,
    pub phone: &'a str,
    pub age: i32,
    pub country_of_origin: &'a str,
    pub applied_date: DateTime<Utc>,
    pub hired: bool,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub last_modified_by: Option<&'a str>,
    pub is_deleted: bool,
    pub deleted_date: Option<DateTime<Utc>>,
    pub deleted_reason: Option<&'a str>,
    pub row_version: &'a [u8],
}

impl<'a> ApplicantChangeset<'a> {
    pub(crate) fn from_domain(record: &'a Applicant, row_version: &'a RowVersion) -> Self {
        Self {
            name: &record.name,
            family_name: &record.family_name,
            address: &record.address,
            email_address: &record.email_address,
            phone: &record.phone,
            age: record.age,
            country_of_origin: &record.country_of_origin,
            applied_date: record.applied_date,
            hired: record.hired,
            last_modified_date: record.last_modified_date,
            last_modified_by: record.last_modified_by.as_deref(),
            is_deleted: record.is_deleted,
            deleted_date: record.deleted_date,
            deleted_reason: record.deleted_reason.as_deref(),
            row_version: row_version.as_bytes(),
        }
    }
}
