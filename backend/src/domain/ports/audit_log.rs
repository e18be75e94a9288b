//! Port for the applicant audit trail.

use crate::domain::AuditEvent;

/// Sink for [`AuditEvent`]s. Recording is synchronous and infallible from
/// the pipeline's point of view; events are neither batched nor dropped.
#[cfg_attr(test, mockall::automock)]
pub trait ApplicantAuditLog: Send + Sync {
    /// Record one event.
    fn record(&self, event: &AuditEvent);
}
