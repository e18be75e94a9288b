//! Applicant entity, identifiers, the row-version concurrency token, and the
//! command payloads accepted by the mutation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actor recorded on audit fields until real authentication exists.
pub const SYSTEM_ACTOR: &str = "System";

/// Reason stored on soft delete when the caller gives none.
pub const DEFAULT_DELETION_REASON: &str = "User requested deletion";

/// Store-assigned applicant identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ApplicantId(i64);

/// Raised when an identifier is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("applicant id must be positive, got {0}")]
pub struct InvalidApplicantId(pub i64);

impl ApplicantId {
    /// Validate a raw identifier.
    ///
    /// # Errors
    /// Returns [`InvalidApplicantId`] unless `value > 0`.
    pub const fn new(value: i64) -> Result<Self, InvalidApplicantId> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(InvalidApplicantId(value))
        }
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ApplicantId {
    type Error = InvalidApplicantId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApplicantId> for i64 {
    fn from(value: ApplicantId) -> Self {
        value.0
    }
}

impl std::fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque concurrency token regenerated by the store on every write.
///
/// Tokens are compared byte-for-byte and travel over HTTP as lowercase hex.
///
/// # Examples
/// ```
/// use applicant_backend::domain::RowVersion;
///
/// let token = RowVersion::from_hex("00ff10").expect("hex");
/// assert_eq!(token.as_bytes(), &[0x00, 0xff, 0x10]);
/// assert_eq!(token.to_string(), "00ff10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowVersion(Vec<u8>);

impl RowVersion {
    /// Wrap raw token bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Fresh random token, as produced by store adapters on write.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().as_bytes().to_vec())
    }

    /// Decode a hex representation.
    ///
    /// # Errors
    /// Propagates [`hex::FromHexError`] for malformed input.
    pub fn from_hex(value: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(value.trim()).map(Self)
    }

    /// Raw token bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the token, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Whether the token carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Byte-for-byte equality with `other`.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl std::fmt::Display for RowVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

/// Presented token differs from the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencyMismatch {
    /// Token supplied by the caller.
    pub presented: RowVersion,
    /// Token currently stored.
    pub stored: RowVersion,
}

/// Detect a lost update.
///
/// The comparison only applies when both sides carry a token; a write without
/// a presented token, or against a record that has none, is not checked.
///
/// # Errors
/// Returns [`ConcurrencyMismatch`] when both tokens exist and differ.
pub fn check_concurrency(
    presented: Option<&RowVersion>,
    stored: Option<&RowVersion>,
) -> Result<(), ConcurrencyMismatch> {
    match (presented, stored) {
        (Some(presented), Some(stored)) if !presented.matches(stored) => Err(ConcurrencyMismatch {
            presented: presented.clone(),
            stored: stored.clone(),
        }),
        _ => Ok(()),
    }
}

/// Persisted applicant record.
///
/// ## Invariants
/// - `email_address` is lowercase.
/// - `deleted_date` and `deleted_reason` are set if and only if `is_deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    /// Store-assigned identifier.
    pub id: ApplicantId,
    /// Given name.
    pub name: String,
    /// Family name.
    pub family_name: String,
    /// Postal address.
    pub address: String,
    /// Lowercase email address, unique among live records.
    pub email_address: String,
    /// Phone number as supplied, sanitised.
    pub phone: String,
    /// Age in years.
    pub age: i32,
    /// Country of origin.
    pub country_of_origin: String,
    /// When the applicant applied.
    pub applied_date: DateTime<Utc>,
    /// Whether the applicant was hired.
    pub hired: bool,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Last modification timestamp.
    pub last_modified_date: Option<DateTime<Utc>>,
    /// Actor that created the record.
    pub created_by: String,
    /// Actor that last modified the record.
    pub last_modified_by: Option<String>,
    /// Soft-delete flag.
    pub is_deleted: bool,
    /// When the record was soft-deleted.
    pub deleted_date: Option<DateTime<Utc>>,
    /// Why the record was soft-deleted.
    pub deleted_reason: Option<String>,
    /// Concurrency token.
    pub row_version: Option<RowVersion>,
}

impl Applicant {
    /// Mark the record as logically removed.
    pub fn soft_delete(&mut self, reason: String, actor: &str, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_date = Some(now);
        self.deleted_reason = Some(reason);
        self.touch(actor, now);
    }

    /// Stamp the modification audit fields.
    pub fn touch(&mut self, actor: &str, now: DateTime<Utc>) {
        self.last_modified_date = Some(now);
        self.last_modified_by = Some(actor.to_owned());
    }
}

/// Sanitised field set handed to the store for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplicant {
    /// Given name.
    pub name: String,
    /// Family name.
    pub family_name: String,
    /// Postal address.
    pub address: String,
    /// Lowercase email address.
    pub email_address: String,
    /// Phone number.
    pub phone: String,
    /// Age in years.
    pub age: i32,
    /// Country of origin.
    pub country_of_origin: String,
    /// When the applicant applied.
    pub applied_date: DateTime<Utc>,
    /// Whether the applicant was hired.
    pub hired: bool,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Actor creating the record.
    pub created_by: String,
    /// Initial modification timestamp, equal to `created_date`.
    pub last_modified_date: DateTime<Utc>,
    /// Initial modifying actor, equal to `created_by`.
    pub last_modified_by: String,
}

/// Caller supplied applicant attributes, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantFields {
    /// Given name.
    pub name: String,
    /// Family name.
    pub family_name: String,
    /// Postal address.
    pub address: String,
    /// Email address in any case.
    pub email_address: String,
    /// Phone number.
    pub phone: String,
    /// Age in years.
    pub age: i32,
    /// Country of origin.
    pub country_of_origin: String,
    /// When the applicant applied.
    pub applied_date: DateTime<Utc>,
    /// Whether the applicant was hired.
    pub hired: bool,
}

/// Create command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateApplicant {
    /// Attribute values for the new record.
    pub fields: ApplicantFields,
}

/// Update command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateApplicant {
    /// Raw target identifier, validated by the pipeline.
    pub id: i64,
    /// Token the caller read, if any.
    pub row_version: Option<RowVersion>,
    /// Replacement attribute values.
    pub fields: ApplicantFields,
}

/// Delete command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteApplicant {
    /// Raw target identifier, validated by the pipeline.
    pub id: i64,
    /// Token the caller read, if any.
    pub row_version: Option<RowVersion>,
    /// Remove physically instead of flagging.
    pub hard_delete: bool,
    /// Optional free-text justification.
    pub reason: Option<String>,
}
