//! PostgreSQL-backed `ApplicantRepository` using Diesel.
//!
//! A unit of work owns one pooled connection with an open transaction.
//! Writes check the presented row version in the `WHERE` clause; a write
//! that touches no row is then classified as missing or stale.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use tracing::debug;

use crate::domain::ports::{
    ApplicantFilter, ApplicantRepository, ApplicantRepositoryError, ApplicantUnitOfWork,
    PageWindow, SortField, SortOrder,
};
use crate::domain::{Applicant, ApplicantId, NewApplicant, RowVersion};

use super::diesel_helpers::{
    escape_like, map_diesel_error, map_pool_error, map_row_error, to_sql_bigint,
};
use super::models::{ApplicantChangeset, ApplicantRow, NewApplicantRow};
use super::pool::DbPool;
use super::schema::applicants;

type BoxedApplicants = applicants::BoxedQuery<'static, Pg>;

/// Diesel-backed implementation of the [`ApplicantRepository`] port.
#[derive(Clone)]
pub struct DieselApplicantRepository {
    pool: DbPool,
}

impl DieselApplicantRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Apply every criterion in `filter` to a fresh query.
fn filtered(filter: &ApplicantFilter) -> BoxedApplicants {
    let mut query = applicants::table.into_boxed();
    if !filter.include_deleted {
        query = query.filter(applicants::is_deleted.eq(false));
    }
    if let Some(id) = filter.exclude_id {
        query = query.filter(applicants::id.ne(id.get()));
    }
    if let Some(email) = &filter.email_equals {
        query = query.filter(applicants::email_address.ilike(escape_like(email)));
    }
    if let Some(term) = &filter.search_term {
        let pattern = format!("%{}%", escape_like(term));
        query = query.filter(
            applicants::name
                .ilike(pattern.clone())
                .or(applicants::family_name.ilike(pattern.clone()))
                .or(applicants::email_address.ilike(pattern.clone()))
                .or(applicants::address.ilike(pattern.clone()))
                .or(applicants::phone.ilike(pattern.clone()))
                .or(applicants::country_of_origin.ilike(pattern)),
        );
    }
    if let Some(min) = filter.min_age {
        query = query.filter(applicants::age.ge(min));
    }
    if let Some(max) = filter.max_age {
        query = query.filter(applicants::age.le(max));
    }
    if let Some(country) = &filter.country {
        query = query.filter(applicants::country_of_origin.ilike(escape_like(country)));
    }
    if let Some(hired) = filter.hired {
        query = query.filter(applicants::hired.eq(hired));
    }
    if let Some(from) = filter.applied_from {
        query = query.filter(applicants::applied_date.ge(from));
    }
    if let Some(to) = filter.applied_to {
        query = query.filter(applicants::applied_date.le(to));
    }
    query
}

macro_rules! order_then_id {
    ($query:expr, $column:expr, $descending:expr) => {
        if $descending {
            $query.order(($column.desc(), applicants::id.asc()))
        } else {
            $query.order(($column.asc(), applicants::id.asc()))
        }
    };
}

/// Order by the requested column, breaking ties by ascending id.
fn ordered(query: BoxedApplicants, order: SortOrder) -> BoxedApplicants {
    let descending = order.descending;
    match order.field {
        SortField::Name => order_then_id!(query, applicants::name, descending),
        SortField::FamilyName => order_then_id!(query, applicants::family_name, descending),
        SortField::Age => order_then_id!(query, applicants::age, descending),
        SortField::AppliedDate => order_then_id!(query, applicants::applied_date, descending),
        SortField::CountryOfOrigin => {
            order_then_id!(query, applicants::country_of_origin, descending)
        }
        SortField::Email => order_then_id!(query, applicants::email_address, descending),
        SortField::Id if descending => query.order(applicants::id.desc()),
        SortField::Id => query.order(applicants::id.asc()),
    }
}

fn paged(filter: &ApplicantFilter, order: SortOrder, window: PageWindow) -> BoxedApplicants {
    ordered(filtered(filter), order)
        .offset(to_sql_bigint(window.offset))
        .limit(i64::from(window.limit))
}

async fn load_by_id(
    conn: &mut AsyncPgConnection,
    id: ApplicantId,
) -> Result<Option<Applicant>, ApplicantRepositoryError> {
    let row: Option<ApplicantRow> = applicants::table
        .filter(applicants::id.eq(id.get()))
        .select(ApplicantRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(ApplicantRow::into_domain)
        .transpose()
        .map_err(map_row_error)
}

async fn count_in(
    conn: &mut AsyncPgConnection,
    filter: &ApplicantFilter,
) -> Result<u64, ApplicantRepositoryError> {
    let total: i64 = filtered(filter)
        .count()
        .get_result(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(u64::try_from(total).unwrap_or_default())
}

async fn load_page(
    conn: &mut AsyncPgConnection,
    filter: &ApplicantFilter,
    order: SortOrder,
    window: PageWindow,
) -> Result<Vec<Applicant>, ApplicantRepositoryError> {
    let rows: Vec<ApplicantRow> = paged(filter, order, window)
        .select(ApplicantRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    rows.into_iter()
        .map(ApplicantRow::into_domain)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_row_error)
}

/// Classify a write that matched no row.
async fn zero_row_failure(
    conn: &mut AsyncPgConnection,
    id: ApplicantId,
) -> ApplicantRepositoryError {
    match load_by_id(conn, id).await {
        Ok(Some(_)) => ApplicantRepositoryError::revision_mismatch(id.get()),
        Ok(None) => ApplicantRepositoryError::not_found(id.get()),
        Err(error) => error,
    }
}

#[async_trait]
impl ApplicantRepository for DieselApplicantRepository {
    async fn begin(&self) -> Result<Box<dyn ApplicantUnitOfWork>, ApplicantRepositoryError> {
        let mut conn = self.pool.get_owned().await.map_err(map_pool_error)?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Box::new(DieselUnitOfWork { conn }))
    }

    async fn find_by_id(
        &self,
        id: ApplicantId,
    ) -> Result<Option<Applicant>, ApplicantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_by_id(&mut conn, id).await
    }

    async fn find_matching(
        &self,
        filter: &ApplicantFilter,
        order: SortOrder,
        window: PageWindow,
    ) -> Result<Vec<Applicant>, ApplicantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_page(&mut conn, filter, order, window).await
    }

    async fn count_matching(
        &self,
        filter: &ApplicantFilter,
    ) -> Result<u64, ApplicantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        count_in(&mut conn, filter).await
    }
}

/// Open transaction on an owned connection.
///
/// A unit of work dropped mid-transaction hands back a connection whose
/// transaction manager reports it broken, so the pool discards it and the
/// server rolls the transaction back.
struct DieselUnitOfWork {
    conn: PooledConnection<'static, AsyncPgConnection>,
}

#[async_trait]
impl ApplicantUnitOfWork for DieselUnitOfWork {
    async fn find_by_id(
        &mut self,
        id: ApplicantId,
    ) -> Result<Option<Applicant>, ApplicantRepositoryError> {
        load_by_id(&mut self.conn, id).await
    }

    async fn count_matching(
        &mut self,
        filter: &ApplicantFilter,
    ) -> Result<u64, ApplicantRepositoryError> {
        count_in(&mut self.conn, filter).await
    }

    async fn insert(&mut self, record: NewApplicant) -> Result<Applicant, ApplicantRepositoryError> {
        let token = RowVersion::generate();
        let row = NewApplicantRow::from_domain(&record, &token);
        let inserted: ApplicantRow = diesel::insert_into(applicants::table)
            .values(&row)
            .returning(ApplicantRow::as_returning())
            .get_result(&mut *self.conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(id = inserted.id, "inserted applicant row");
        inserted.into_domain().map_err(map_row_error)
    }

    async fn update(&mut self, record: &Applicant) -> Result<Applicant, ApplicantRepositoryError> {
        let token = RowVersion::generate();
        let changes = ApplicantChangeset::from_domain(record, &token);
        let target = applicants::table.filter(applicants::id.eq(record.id.get()));
        let updated: Option<ApplicantRow> = match record.row_version.as_ref() {
            Some(expected) => diesel::update(
                target.filter(applicants::row_version.eq(expected.as_bytes().to_vec())),
            )
            .set(&changes)
            .returning(ApplicantRow::as_returning())
            .get_result(&mut *self.conn)
            .await
            .optional(),
            None => diesel::update(target)
                .set(&changes)
                .returning(ApplicantRow::as_returning())
                .get_result(&mut *self.conn)
                .await
                .optional(),
        }
        .map_err(map_diesel_error)?;

        match updated {
            Some(row) => row.into_domain().map_err(map_row_error),
            None => Err(zero_row_failure(&mut self.conn, record.id).await),
        }
    }

    async fn delete(&mut self, record: &Applicant) -> Result<(), ApplicantRepositoryError> {
        let target = applicants::table.filter(applicants::id.eq(record.id.get()));
        let removed = match record.row_version.as_ref() {
            Some(expected) => diesel::delete(
                target.filter(applicants::row_version.eq(expected.as_bytes().to_vec())),
            )
            .execute(&mut *self.conn)
            .await,
            None => diesel::delete(target).execute(&mut *self.conn).await,
        }
        .map_err(map_diesel_error)?;

        if removed == 0 {
            return Err(zero_row_failure(&mut self.conn, record.id).await);
        }
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), ApplicantRepositoryError> {
        AnsiTransactionManager::commit_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), ApplicantRepositoryError> {
        AnsiTransactionManager::rollback_transaction(&mut *self.conn)
            .await
            .map_err(map_diesel_error)
    }
}
