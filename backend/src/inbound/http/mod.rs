//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod applicants;
pub mod applicants_dto;
pub mod countries;
pub mod error;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` route.
pub fn configure_api(cfg: &mut actix_web::web::ServiceConfig) {
    applicants::configure(cfg);
    countries::configure(cfg);
}
