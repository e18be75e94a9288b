//! Failure taxonomy of the applicant pipelines.
//!
//! Absence is not a failure: lookups return `Ok(None)` and mutations against
//! missing records return `Ok(false)`.

use serde_json::json;

use crate::domain::Error;
use crate::domain::validation::{FieldViolation, ViolationKind};

/// Tagged failure returned by the mutation and query pipelines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicantError {
    /// A field broke a schema or format rule.
    #[error("{message}")]
    ValidationFailed {
        /// Wire name of the offending field.
        field: String,
        /// Human-readable reason.
        message: String,
    },
    /// A security heuristic fired.
    #[error("{message}")]
    SecurityRejected {
        /// Human-readable reason.
        message: String,
    },
    /// A cross-field or cross-record business rule failed.
    #[error("{message}")]
    BusinessRule {
        /// Human-readable reason.
        message: String,
    },
    /// The record changed since the caller read it.
    #[error("{message}")]
    ConcurrencyConflict {
        /// Human-readable reason.
        message: String,
    },
    /// A collaborator failed.
    #[error("{message}")]
    SystemFailure {
        /// Human-readable reason.
        message: String,
    },
}

impl ApplicantError {
    /// Field-level rejection.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Security rejection.
    pub fn security(message: impl Into<String>) -> Self {
        Self::SecurityRejected {
            message: message.into(),
        }
    }

    /// Business-rule rejection.
    pub fn business(message: impl Into<String>) -> Self {
        Self::BusinessRule {
            message: message.into(),
        }
    }

    /// Lost-update rejection.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::ConcurrencyConflict {
            message: message.into(),
        }
    }

    /// Collaborator failure.
    pub fn system(message: impl Into<String>) -> Self {
        Self::SystemFailure {
            message: message.into(),
        }
    }

    /// Human-readable reason, whatever the variant.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::ValidationFailed { message, .. }
            | Self::SecurityRejected { message }
            | Self::BusinessRule { message }
            | Self::ConcurrencyConflict { message }
            | Self::SystemFailure { message } => message,
        }
    }

    /// Whether the caller can correct the request and retry.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::SystemFailure { .. })
    }
}

impl From<FieldViolation> for ApplicantError {
    fn from(violation: FieldViolation) -> Self {
        match violation.kind {
            ViolationKind::Security => Self::security(violation.message),
            _ => Self::validation(violation.field, violation.message),
        }
    }
}

impl From<ApplicantError> for Error {
    fn from(error: ApplicantError) -> Self {
        match error {
            ApplicantError::ValidationFailed { field, message } => Error::invalid_request(message)
                .with_details(json!({ "kind": "validation_failed", "field": field })),
            ApplicantError::SecurityRejected { message } => Error::invalid_request(message)
                .with_details(json!({ "kind": "security_rejected" })),
            ApplicantError::BusinessRule { message } => {
                Error::invalid_request(message).with_details(json!({ "kind": "business_rule" }))
            }
            ApplicantError::ConcurrencyConflict { message } => Error::conflict(message),
            ApplicantError::SystemFailure { message } => Error::internal(message),
        }
    }
}
