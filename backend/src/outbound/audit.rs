//! Tracing-backed audit trail.
//!
//! Events land on the [`AUDIT_TARGET`] target so operators can route them
//! separately from request logs. Security rejections carry
//! `severity = "security"`.

use tracing::{error, info, warn};

use crate::domain::AuditEvent;
use crate::domain::ports::ApplicantAuditLog;

/// Log target shared by every audit record.
pub const AUDIT_TARGET: &str = "applicant_audit";

/// Writes each [`AuditEvent`] as one structured log record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditLog;

impl ApplicantAuditLog for TracingAuditLog {
    fn record(&self, event: &AuditEvent) {
        match event {
            AuditEvent::RecordCreated { id, actor } => info!(
                target: AUDIT_TARGET,
                event = "record_created",
                id = id.get(),
                actor = %actor,
                "applicant created"
            ),
            AuditEvent::RecordUpdated { id, actor } => info!(
                target: AUDIT_TARGET,
                event = "record_updated",
                id = id.get(),
                actor = %actor,
                "applicant updated"
            ),
            AuditEvent::RecordDeleted {
                id,
                hard,
                reason,
                actor,
            } => info!(
                target: AUDIT_TARGET,
                event = "record_deleted",
                id = id.get(),
                hard = *hard,
                reason = reason.as_deref().unwrap_or(""),
                actor = %actor,
                "applicant deleted"
            ),
            AuditEvent::ValidationRejected {
                operation,
                id,
                reason,
            } => warn!(
                target: AUDIT_TARGET,
                event = "validation_rejected",
                operation = operation.as_str(),
                id = ?id,
                reason = %reason,
                "applicant input rejected"
            ),
            AuditEvent::SecurityRejected {
                operation,
                id,
                reason,
            } => warn!(
                target: AUDIT_TARGET,
                event = "security_rejected",
                severity = "security",
                operation = operation.as_str(),
                id = ?id,
                reason = %reason,
                "applicant input failed a security check"
            ),
            AuditEvent::SystemError {
                operation,
                id,
                cause,
            } => error!(
                target: AUDIT_TARGET,
                event = "system_error",
                operation = operation.as_str(),
                id = ?id,
                cause = %cause,
                "applicant operation failed"
            ),
            AuditEvent::RecordsQueried {
                operation,
                returned,
                total,
            } => info!(
                target: AUDIT_TARGET,
                event = "records_queried",
                operation = operation.as_str(),
                returned = *returned,
                total = *total,
                "applicant records read"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Captures the JSON log output for single events.
    use std::io;
    use std::sync::{Arc, Mutex};

    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::{ApplicantId, AuditOperation};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("capture lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record_one(event: &AuditEvent) -> Value {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || TracingAuditLog.record(event));

        let bytes = captured.0.lock().expect("capture lock").clone();
        let line = String::from_utf8(bytes).expect("utf-8 log line");
        serde_json::from_str(line.trim()).expect("one JSON record")
    }

    #[rstest]
    fn security_rejections_are_flagged() {
        let record = record_one(&AuditEvent::SecurityRejected {
            operation: AuditOperation::Create,
            id: None,
            reason: "Potential XSS attack detected in input data".to_owned(),
        });
        assert_eq!(record["target"], AUDIT_TARGET);
        assert_eq!(record["level"], "WARN");
        assert_eq!(record["fields"]["severity"], "security");
        assert_eq!(record["fields"]["operation"], "create");
    }

    #[rstest]
    fn system_errors_log_at_error_level() {
        let record = record_one(&AuditEvent::SystemError {
            operation: AuditOperation::Delete,
            id: Some(7),
            cause: "connection reset".to_owned(),
        });
        assert_eq!(record["level"], "ERROR");
        assert_eq!(record["fields"]["cause"], "connection reset");
    }

    #[rstest]
    fn deletions_record_mode_and_reason() {
        let record = record_one(&AuditEvent::RecordDeleted {
            id: ApplicantId::new(3).expect("valid id"),
            hard: true,
            reason: Some("Duplicate".to_owned()),
            actor: "System".to_owned(),
        });
        assert_eq!(record["level"], "INFO");
        assert_eq!(record["fields"]["id"], 3);
        assert_eq!(record["fields"]["hard"], true);
        assert_eq!(record["fields"]["reason"], "Duplicate");
    }
}
