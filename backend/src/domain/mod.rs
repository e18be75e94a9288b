//! Domain primitives, pipelines and ports.
//!
//! Purpose: hold the applicant entity, the rules it must satisfy, and the
//! mutation and query pipelines that enforce them. Nothing here knows about
//! HTTP or SQL; collaborators are reached through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Applicant, RowVersion, command payloads — the record and its writes.
//! - ApplicantService / ApplicantQueryService — pipeline entry points.

pub mod applicant;
pub mod applicant_error;
pub mod applicant_query;
pub mod applicant_service;
pub mod audit;
pub mod error;
pub mod policy;
pub mod ports;
pub mod security;
pub mod trace_id;
pub mod validation;

pub use self::applicant::{
    Applicant, ApplicantFields, ApplicantId, ConcurrencyMismatch, CreateApplicant,
    DEFAULT_DELETION_REASON, DeleteApplicant, InvalidApplicantId, NewApplicant, RowVersion,
    SYSTEM_ACTOR, UpdateApplicant, check_concurrency,
};
pub use self::applicant_error::ApplicantError;
pub use self::applicant_query::ApplicantQueryService;
pub use self::applicant_service::{ApplicantService, CONFLICT_MESSAGE};
pub use self::audit::{AuditEvent, AuditOperation};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::policy::{AgeBounds, CountryPolicy, InvalidAgeBounds, ValidationPolicy};
pub use self::trace_id::TraceId;
pub use self::validation::{
    ApplicantField, FieldViolation, ValidationPath, ViolationKind, validate_name,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use applicant_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such applicant"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
