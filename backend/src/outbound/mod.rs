//! Outbound adapters implementing the domain ports.
//!
//! - **persistence**: PostgreSQL applicant store using Diesel
//! - **memory**: in-process applicant store for tests and database-less runs
//! - **countries**: REST country directory with a listing cache
//! - **audit**: audit trail written through `tracing`
//!
//! Adapters translate between domain types and infrastructure formats and
//! hold no business rules.

pub mod audit;
pub mod countries;
pub mod memory;
pub mod persistence;
