//! In-process applicant store.
//!
//! Used by tests and by the server when no database is configured. A unit of
//! work holds the store lock for its whole lifetime and stages writes on a
//! private copy, which replaces the shared state on commit.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::ports::{
    ApplicantFilter, ApplicantRepository, ApplicantRepositoryError, ApplicantUnitOfWork,
    PageWindow, SortOrder,
};
use crate::domain::{Applicant, ApplicantId, NewApplicant, RowVersion, check_concurrency};

#[derive(Debug, Default, Clone)]
struct StoreState {
    records: BTreeMap<ApplicantId, Applicant>,
    last_id: i64,
}

impl StoreState {
    fn count(&self, filter: &ApplicantFilter) -> u64 {
        let matching = self.records.values().filter(|r| filter.matches(r)).count();
        u64::try_from(matching).unwrap_or(u64::MAX)
    }

    fn stored_for_write(&self, record: &Applicant) -> Result<&Applicant, ApplicantRepositoryError> {
        let stored = self
            .records
            .get(&record.id)
            .ok_or_else(|| ApplicantRepositoryError::not_found(record.id.get()))?;
        check_concurrency(record.row_version.as_ref(), stored.row_version.as_ref())
            .map_err(|_| ApplicantRepositoryError::revision_mismatch(record.id.get()))?;
        Ok(stored)
    }
}

/// Mutex-guarded map of applicants keyed by identifier.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApplicantRepository {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryApplicantRepository {
    /// Every stored record, deleted or not, in identifier order.
    pub async fn snapshot(&self) -> Vec<Applicant> {
        self.state.lock().await.records.values().cloned().collect()
    }
}

#[async_trait]
impl ApplicantRepository for InMemoryApplicantRepository {
    async fn begin(&self) -> Result<Box<dyn ApplicantUnitOfWork>, ApplicantRepositoryError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, staged }))
    }

    async fn find_by_id(
        &self,
        id: ApplicantId,
    ) -> Result<Option<Applicant>, ApplicantRepositoryError> {
        Ok(self.state.lock().await.records.get(&id).cloned())
    }

    async fn find_matching(
        &self,
        filter: &ApplicantFilter,
        order: SortOrder,
        window: PageWindow,
    ) -> Result<Vec<Applicant>, ApplicantRepositoryError> {
        let state = self.state.lock().await;
        let mut matching: Vec<&Applicant> =
            state.records.values().filter(|r| filter.matches(r)).collect();
        matching.sort_by(|left, right| order.compare(left, right));
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_matching(
        &self,
        filter: &ApplicantFilter,
    ) -> Result<u64, ApplicantRepositoryError> {
        Ok(self.state.lock().await.count(filter))
    }
}

struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<StoreState>,
    staged: StoreState,
}

#[async_trait]
impl ApplicantUnitOfWork for InMemoryUnitOfWork {
    async fn find_by_id(
        &mut self,
        id: ApplicantId,
    ) -> Result<Option<Applicant>, ApplicantRepositoryError> {
        Ok(self.staged.records.get(&id).cloned())
    }

    async fn count_matching(
        &mut self,
        filter: &ApplicantFilter,
    ) -> Result<u64, ApplicantRepositoryError> {
        Ok(self.staged.count(filter))
    }

    async fn insert(&mut self, record: NewApplicant) -> Result<Applicant, ApplicantRepositoryError> {
        let next = self.staged.last_id.saturating_add(1);
        let id = ApplicantId::new(next)
            .map_err(|err| ApplicantRepositoryError::query(err.to_string()))?;
        let applicant = Applicant {
            id,
            name: record.name,
            family_name: record.family_name,
            address: record.address,
            email_address: record.email_address,
            phone: record.phone,
            age: record.age,
            country_of_origin: record.country_of_origin,
            applied_date: record.applied_date,
            hired: record.hired,
            created_date: record.created_date,
            last_modified_date: Some(record.last_modified_date),
            created_by: record.created_by,
            last_modified_by: Some(record.last_modified_by),
            is_deleted: false,
            deleted_date: None,
            deleted_reason: None,
            row_version: Some(RowVersion::generate()),
        };
        self.staged.last_id = next;
        self.staged.records.insert(id, applicant.clone());
        Ok(applicant)
    }

    async fn update(&mut self, record: &Applicant) -> Result<Applicant, ApplicantRepositoryError> {
        self.staged.stored_for_write(record)?;
        let mut updated = record.clone();
        updated.row_version = Some(RowVersion::generate());
        self.staged.records.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&mut self, record: &Applicant) -> Result<(), ApplicantRepositoryError> {
        self.staged.stored_for_write(record)?;
        self.staged.records.remove(&record.id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), ApplicantRepositoryError> {
        let Self { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ApplicantRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn new_applicant() -> NewApplicant {
        let at = Utc
            .with_ymd_and_hms(2024, 2, 1, 8, 30, 0)
            .single()
            .expect("valid timestamp");
        NewApplicant {
            name: "Jordan".to_owned(),
            family_name: "Rivers".to_owned(),
            address: "12 Nile Street, Cairo".to_owned(),
            email_address: "jordan@example.com".to_owned(),
            phone: "+201234567890".to_owned(),
            age: 30,
            country_of_origin: "Egypt".to_owned(),
            applied_date: at,
            hired: false,
            created_date: at,
            created_by: "System".to_owned(),
            last_modified_date: at,
            last_modified_by: "System".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn committed_insert_assigns_identity_and_token(new_applicant: NewApplicant) {
        let repo = InMemoryApplicantRepository::default();
        let mut unit = repo.begin().await.expect("begin");
        let created = unit.insert(new_applicant).await.expect("insert");
        unit.commit().await.expect("commit");

        assert_eq!(created.id.get(), 1);
        assert!(created.row_version.is_some());
        let stored = repo.find_by_id(created.id).await.expect("lookup");
        assert_eq!(stored, Some(created));
    }

    #[rstest]
    #[tokio::test]
    async fn dropped_unit_of_work_discards_writes(new_applicant: NewApplicant) {
        let repo = InMemoryApplicantRepository::default();
        {
            let mut unit = repo.begin().await.expect("begin");
            unit.insert(new_applicant).await.expect("insert");
        }
        assert!(repo.snapshot().await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn update_regenerates_token_and_rejects_stale_one(new_applicant: NewApplicant) {
        let repo = InMemoryApplicantRepository::default();
        let mut unit = repo.begin().await.expect("begin");
        let created = unit.insert(new_applicant).await.expect("insert");
        let updated = unit.update(&created).await.expect("update");
        assert_ne!(updated.row_version, created.row_version);

        let error = unit.update(&created).await.expect_err("stale token");
        assert_eq!(
            error,
            ApplicantRepositoryError::revision_mismatch(created.id.get())
        );
        unit.rollback().await.expect("rollback");
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_missing_record_reports_not_found(new_applicant: NewApplicant) {
        let repo = InMemoryApplicantRepository::default();
        let mut unit = repo.begin().await.expect("begin");
        let mut created = unit.insert(new_applicant).await.expect("insert");
        unit.delete(&created).await.expect("delete");
        created.row_version = None;
        let error = unit.delete(&created).await.expect_err("already gone");
        assert_eq!(error, ApplicantRepositoryError::not_found(1_i64));
    }
}
