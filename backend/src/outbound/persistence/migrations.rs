//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `database_url`.
///
/// Runs on a blocking thread because the migration harness needs a
/// synchronous connection.
///
/// # Errors
///
/// Returns [`PoolError::Migrate`] when the database cannot be reached or a
/// migration fails.
pub async fn run_pending_migrations(database_url: String) -> Result<usize, PoolError> {
    tokio::task::spawn_blocking(move || {
        let mut connection = PgConnection::establish(&database_url)
            .map_err(|err| PoolError::migrate(err.to_string()))?;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| PoolError::migrate(err.to_string()))?;
        info!(count = applied.len(), "applied pending migrations");
        Ok(applied.len())
    })
    .await
    .map_err(|err| PoolError::migrate(err.to_string()))?
}
