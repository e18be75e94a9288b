//! Field-level rules for applicant attributes.
//!
//! Each rule checks one field and reports the first violation it finds.
//! Checks run in a fixed order: presence, security screening, length, then
//! format. That way injection payloads are classified as security
//! violations even when they are also malformed.
//!
//! Length bounds differ between the create and update paths. Both are kept
//! as they were historically enforced, selected through [`ValidationPath`].

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::domain::AgeBounds;
use crate::domain::security::{is_sql_injection_attempt_allowing, is_xss_attempt};

/// Metacharacters admitted by the personal-name and country grammars.
pub const NAME_ADMITTED: [char; 2] = ['\'', '-'];
/// Metacharacters admitted by the address grammar.
pub const ADDRESS_ADMITTED: [char; 1] = ['-'];

/// Attributes subject to validation, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicantField {
    /// Record identifier.
    Id,
    /// Given name.
    Name,
    /// Family name.
    FamilyName,
    /// Postal address.
    Address,
    /// Email address.
    EmailAddress,
    /// Phone number.
    Phone,
    /// Age in years.
    Age,
    /// Country of origin.
    CountryOfOrigin,
    /// Application timestamp.
    AppliedDate,
    /// Concurrency token.
    RowVersion,
    /// Deletion reason.
    Reason,
}

impl ApplicantField {
    /// camelCase field name used in error details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::FamilyName => "familyName",
            Self::Address => "address",
            Self::EmailAddress => "emailAddress",
            Self::Phone => "phone",
            Self::Age => "age",
            Self::CountryOfOrigin => "countryOfOrigin",
            Self::AppliedDate => "appliedDate",
            Self::RowVersion => "rowVersion",
            Self::Reason => "reason",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Id => "Applicant ID",
            Self::Name => "Name",
            Self::FamilyName => "Family name",
            Self::Address => "Address",
            Self::EmailAddress => "Email address",
            Self::Phone => "Phone number",
            Self::Age => "Age",
            Self::CountryOfOrigin => "Country of origin",
            Self::AppliedDate => "Applied date",
            Self::RowVersion => "Row version",
            Self::Reason => "Deletion reason",
        }
    }
}

/// Which mutation is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPath {
    /// New record.
    Create,
    /// Existing record.
    Update,
}

impl ValidationPath {
    const fn name_length(self) -> (usize, usize) {
        match self {
            Self::Create => (5, 100),
            Self::Update => (2, 100),
        }
    }

    const fn address_length(self) -> (usize, usize) {
        match self {
            Self::Create => (10, 255),
            Self::Update => (10, 200),
        }
    }

    const fn email_length(self) -> (usize, usize) {
        match self {
            Self::Create => (1, 100),
            Self::Update => (5, 100),
        }
    }

    const fn sql_message(self) -> &'static str {
        match self {
            Self::Create => "Potential SQL injection detected in input data",
            Self::Update => "Invalid input detected",
        }
    }

    const fn xss_message(self) -> &'static str {
        match self {
            Self::Create => "Potential XSS attack detected in input data",
            Self::Update => "Invalid input detected",
        }
    }
}

/// Category of a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Required value absent or blank.
    Missing,
    /// Value too short or too long.
    Length,
    /// Value does not match the field grammar.
    Format,
    /// Numeric or temporal value outside its range.
    Range,
    /// A security heuristic fired.
    Security,
}

/// First rule a field failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire name of the failing field.
    pub field: &'static str,
    /// Violation category.
    pub kind: ViolationKind,
    /// Human-readable reason.
    pub message: String,
}

impl FieldViolation {
    /// Build a violation for `field`.
    pub fn new(field: &'static str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static CREATE_PHONE_RE: OnceLock<Regex> = OnceLock::new();
static UPDATE_PHONE_RE: OnceLock<Regex> = OnceLock::new();
static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("field pattern failed to compile: {error}"))
    })
}

fn name_regex() -> &'static Regex {
    compiled(&NAME_RE, r"^[a-zA-Z\s\-']+$")
}

fn email_regex() -> &'static Regex {
    compiled(&EMAIL_RE, r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
}

fn create_phone_regex() -> &'static Regex {
    compiled(&CREATE_PHONE_RE, r"^\+20\d{10}$")
}

fn update_phone_regex() -> &'static Regex {
    compiled(&UPDATE_PHONE_RE, r"^\+?[\d\s()]+$")
}

fn address_regex() -> &'static Regex {
    compiled(&ADDRESS_RE, r"^[a-zA-Z0-9\s,.\-#]+$")
}

fn require(field: ApplicantField, value: &str) -> Result<(), FieldViolation> {
    if value.trim().is_empty() {
        return Err(FieldViolation::new(
            field.as_str(),
            ViolationKind::Missing,
            format!("{} is required", field.label()),
        ));
    }
    Ok(())
}

/// Run both injection heuristics against one field.
///
/// # Errors
/// Returns a [`ViolationKind::Security`] violation when either heuristic
/// fires.
pub fn screen(
    field: ApplicantField,
    value: &str,
    admitted: &[char],
    path: ValidationPath,
) -> Result<(), FieldViolation> {
    if is_sql_injection_attempt_allowing(value, admitted) {
        return Err(FieldViolation::new(
            field.as_str(),
            ViolationKind::Security,
            path.sql_message(),
        ));
    }
    if is_xss_attempt(value) {
        return Err(FieldViolation::new(
            field.as_str(),
            ViolationKind::Security,
            path.xss_message(),
        ));
    }
    Ok(())
}

fn check_length(
    field: ApplicantField,
    value: &str,
    (min, max): (usize, usize),
) -> Result<(), FieldViolation> {
    let length = value.trim().chars().count();
    if length < min || length > max {
        return Err(FieldViolation::new(
            field.as_str(),
            ViolationKind::Length,
            format!("{} must be between {min} and {max} characters", field.label()),
        ));
    }
    Ok(())
}

fn letters_only_message(field: ApplicantField) -> String {
    format!(
        "{} can only contain letters, spaces, hyphens, and apostrophes",
        field.label()
    )
}

/// Validate a given or family name.
///
/// # Errors
/// Returns the first [`FieldViolation`] found.
///
/// # Examples
/// ```
/// use applicant_backend::domain::{ApplicantField, ValidationPath, validate_name};
///
/// assert!(validate_name(ApplicantField::FamilyName, "Smith-Jones", ValidationPath::Create).is_ok());
/// assert!(validate_name(ApplicantField::Name, "Al", ValidationPath::Create).is_err());
/// assert!(validate_name(ApplicantField::Name, "Al", ValidationPath::Update).is_ok());
/// ```
pub fn validate_name(
    field: ApplicantField,
    value: &str,
    path: ValidationPath,
) -> Result<(), FieldViolation> {
    require(field, value)?;
    screen(field, value, &NAME_ADMITTED, path)?;
    check_length(field, value, path.name_length())?;
    if !name_regex().is_match(value) {
        return Err(FieldViolation::new(
            field.as_str(),
            ViolationKind::Format,
            letters_only_message(field),
        ));
    }
    Ok(())
}

/// Validate an email address in its raw, caller supplied casing.
///
/// # Errors
/// Returns the first [`FieldViolation`] found.
pub fn validate_email(value: &str, path: ValidationPath) -> Result<(), FieldViolation> {
    let field = ApplicantField::EmailAddress;
    require(field, value)?;
    screen(field, value, &[], path)?;
    check_length(field, value, path.email_length())?;
    if !email_regex().is_match(value.trim()) {
        return Err(FieldViolation::new(
            field.as_str(),
            ViolationKind::Format,
            format!("Invalid email format: {}", value.trim()),
        ));
    }
    Ok(())
}

/// Validate a phone number.
///
/// The create path demands the `+20` prefix followed by exactly ten digits.
/// The update path accepts digits with optional leading `+`, spaces and
/// parentheses, provided 7 to 15 digits remain.
///
/// # Errors
/// Returns the first [`FieldViolation`] found.
pub fn validate_phone(value: &str, path: ValidationPath) -> Result<(), FieldViolation> {
    let field = ApplicantField::Phone;
    require(field, value)?;
    screen(field, value, &[], path)?;
    let trimmed = value.trim();
    match path {
        ValidationPath::Create if !create_phone_regex().is_match(trimmed) => {
            Err(FieldViolation::new(
                field.as_str(),
                ViolationKind::Format,
                "Phone number must be exactly 10 digits after +20 prefix",
            ))
        }
        ValidationPath::Update
            if !update_phone_regex().is_match(trimmed)
                || !(7..=15).contains(&digit_count(trimmed)) =>
        {
            Err(FieldViolation::new(
                field.as_str(),
                ViolationKind::Format,
                "Phone number must contain only digits and be between 7 and 15 characters long",
            ))
        }
        _ => Ok(()),
    }
}

fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

/// Business rule on phone length: after dropping everything except digits
/// and `+`, between 7 and 15 characters must remain.
#[must_use]
pub fn phone_length_within_bounds(value: &str) -> bool {
    let cleaned = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .count();
    (7..=15).contains(&cleaned)
}

/// Validate a postal address.
///
/// # Errors
/// Returns the first [`FieldViolation`] found.
pub fn validate_address(value: &str, path: ValidationPath) -> Result<(), FieldViolation> {
    let field = ApplicantField::Address;
    require(field, value)?;
    screen(field, value, &ADDRESS_ADMITTED, path)?;
    check_length(field, value, path.address_length())?;
    if !address_regex().is_match(value) {
        return Err(FieldViolation::new(
            field.as_str(),
            ViolationKind::Format,
            "Address can only contain letters, digits, spaces and , . - #",
        ));
    }
    Ok(())
}

/// Validate the shape of a country name. Directory lookups happen
/// separately.
///
/// # Errors
/// Returns the first [`FieldViolation`] found.
pub fn validate_country(value: &str, path: ValidationPath) -> Result<(), FieldViolation> {
    let field = ApplicantField::CountryOfOrigin;
    require(field, value)?;
    screen(field, value, &NAME_ADMITTED, path)?;
    check_length(field, value, (2, 100))?;
    if !name_regex().is_match(value) {
        return Err(FieldViolation::new(
            field.as_str(),
            ViolationKind::Format,
            letters_only_message(field),
        ));
    }
    Ok(())
}

/// Validate an age against an inclusive range.
///
/// # Errors
/// Returns a [`ViolationKind::Range`] violation outside `bounds`.
pub fn validate_age(value: i32, bounds: AgeBounds) -> Result<(), FieldViolation> {
    if bounds.contains(value) {
        return Ok(());
    }
    Err(FieldViolation::new(
        ApplicantField::Age.as_str(),
        ViolationKind::Range,
        format!("Age must be between {} and {}", bounds.min(), bounds.max()),
    ))
}

/// Reject application timestamps later than `now`.
///
/// # Errors
/// Returns a [`ViolationKind::Range`] violation for future timestamps.
pub fn validate_applied_date(
    value: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), FieldViolation> {
    if value <= now {
        return Ok(());
    }
    Err(FieldViolation::new(
        ApplicantField::AppliedDate.as_str(),
        ViolationKind::Range,
        "Applied date cannot be in the future",
    ))
}

/// Reject a family name equal to the given name, ignoring case.
///
/// # Errors
/// Returns a [`ViolationKind::Format`] violation when the names match.
pub fn validate_distinct_names(name: &str, family_name: &str) -> Result<(), FieldViolation> {
    if name.trim().eq_ignore_ascii_case(family_name.trim()) {
        return Err(FieldViolation::new(
            ApplicantField::FamilyName.as_str(),
            ViolationKind::Format,
            "Name and family name cannot be identical",
        ));
    }
    Ok(())
}

/// Canonical form used for storage and uniqueness comparisons.
#[must_use]
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
