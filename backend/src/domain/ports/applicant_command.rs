//! Driving port for applicant mutations.
//!
//! Inbound adapters hand typed commands to this port. Absent targets are
//! reported as `Ok(false)`; every rejection is an [`ApplicantError`].

use async_trait::async_trait;

use crate::domain::{ApplicantError, ApplicantId, CreateApplicant, DeleteApplicant, UpdateApplicant};

/// Use-case port for creating, updating and deleting applicants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicantCommand: Send + Sync {
    /// Validate and insert a new applicant.
    async fn create(&self, command: CreateApplicant) -> Result<ApplicantId, ApplicantError>;

    /// Validate and overwrite an existing applicant.
    ///
    /// Returns `Ok(false)` when the target is absent or soft-deleted. A stale
    /// token is reported as a conflict ahead of any age or date rule.
    async fn update(&self, command: UpdateApplicant) -> Result<bool, ApplicantError>;

    /// Remove or flag an applicant as removed.
    ///
    /// Returns `Ok(false)` when the target is absent or already soft-deleted.
    async fn delete(&self, command: DeleteApplicant) -> Result<bool, ApplicantError>;
}
