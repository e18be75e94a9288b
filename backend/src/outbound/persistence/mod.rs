//! PostgreSQL persistence via Diesel, `diesel-async` and `bb8`.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; callers only see domain types.
//!
//! ```no_run
//! use applicant_backend::outbound::persistence::{
//!     DbPool, DieselApplicantRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/applicants";
//! run_pending_migrations(url.to_owned()).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let _repository = DieselApplicantRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_applicant_repository;
pub(crate) mod diesel_helpers;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_applicant_repository::DieselApplicantRepository;
pub use migrations::{MIGRATIONS, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
