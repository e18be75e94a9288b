//! Audit events emitted by the applicant pipelines.

use crate::domain::{ApplicantError, ApplicantId};

/// Pipeline operation named in rejection and failure events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOperation {
    /// Create command.
    Create,
    /// Update command.
    Update,
    /// Delete command.
    Delete,
    /// Single-record lookup.
    Get,
    /// Filtered listing.
    List,
    /// Free-text search.
    Search,
}

impl AuditOperation {
    /// Stable lowercase label used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Get => "get",
            Self::List => "list",
            Self::Search => "search",
        }
    }
}

impl std::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something worth recording about a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    /// A record was inserted.
    RecordCreated {
        /// New record.
        id: ApplicantId,
        /// Acting principal.
        actor: String,
    },
    /// A record was modified.
    RecordUpdated {
        /// Modified record.
        id: ApplicantId,
        /// Acting principal.
        actor: String,
    },
    /// A record was removed or flagged as removed.
    RecordDeleted {
        /// Removed record.
        id: ApplicantId,
        /// Physical removal rather than a flag.
        hard: bool,
        /// Stored or supplied reason.
        reason: Option<String>,
        /// Acting principal.
        actor: String,
    },
    /// Input failed a validation or business rule.
    ValidationRejected {
        /// Operation that rejected the input.
        operation: AuditOperation,
        /// Target record, when known.
        id: Option<i64>,
        /// Rejection message.
        reason: String,
    },
    /// Input tripped a security heuristic.
    SecurityRejected {
        /// Operation that rejected the input.
        operation: AuditOperation,
        /// Target record, when known.
        id: Option<i64>,
        /// Rejection message.
        reason: String,
    },
    /// A collaborator failed.
    SystemError {
        /// Operation that failed.
        operation: AuditOperation,
        /// Target record, when known.
        id: Option<i64>,
        /// Underlying cause.
        cause: String,
    },
    /// A read completed.
    RecordsQueried {
        /// Read operation.
        operation: AuditOperation,
        /// Records returned to the caller.
        returned: usize,
        /// Records matching before paging.
        total: u64,
    },
}

impl AuditEvent {
    /// Event describing why `operation` did not complete.
    #[must_use]
    pub fn for_failure(operation: AuditOperation, id: Option<i64>, error: &ApplicantError) -> Self {
        match error {
            ApplicantError::SecurityRejected { message } => Self::SecurityRejected {
                operation,
                id,
                reason: message.clone(),
            },
            ApplicantError::SystemFailure { message } => Self::SystemError {
                operation,
                id,
                cause: message.clone(),
            },
            other => Self::ValidationRejected {
                operation,
                id,
                reason: other.message().to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn failures_map_onto_matching_event_kinds() {
        let security = AuditEvent::for_failure(
            AuditOperation::Create,
            None,
            &ApplicantError::security("blocked"),
        );
        assert!(matches!(security, AuditEvent::SecurityRejected { .. }));

        let system = AuditEvent::for_failure(
            AuditOperation::Update,
            Some(4),
            &ApplicantError::system("db down"),
        );
        assert_eq!(
            system,
            AuditEvent::SystemError {
                operation: AuditOperation::Update,
                id: Some(4),
                cause: "db down".to_owned(),
            }
        );

        let conflict = AuditEvent::for_failure(
            AuditOperation::Delete,
            Some(9),
            &ApplicantError::conflict("stale"),
        );
        assert!(matches!(
            conflict,
            AuditEvent::ValidationRejected { reason, .. } if reason == "stale"
        ));
    }
}
