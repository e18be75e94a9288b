//! Error mapping and query helpers shared by the applicant adapter.

use tracing::debug;

use crate::domain::ports::ApplicantRepositoryError;

use super::pool::PoolError;

/// Map pool errors to repository connection errors.
pub fn map_pool_error(error: PoolError) -> ApplicantRepositoryError {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Migrate { message } => ApplicantRepositoryError::connection(message),
    }
}

/// Map Diesel errors to repository errors, logging the raw cause at debug.
pub fn map_diesel_error(error: diesel::result::Error) -> ApplicantRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => ApplicantRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            ApplicantRepositoryError::query("database query error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ApplicantRepositoryError::duplicate_email()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ApplicantRepositoryError::connection("database connection error")
        }
        DieselError::AlreadyInTransaction | DieselError::NotInTransaction => {
            ApplicantRepositoryError::transaction_state(error.to_string())
        }
        _ => ApplicantRepositoryError::query("database error"),
    }
}

/// Map a row conversion failure to a query error.
pub fn map_row_error(message: String) -> ApplicantRepositoryError {
    ApplicantRepositoryError::query(format!("stored applicant is invalid: {message}"))
}

/// Escape `LIKE` metacharacters so `term` matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Clamp an unsigned paging value into the range Postgres accepts.
pub fn to_sql_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
