//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod applicant_command;
mod applicant_query;
mod applicant_repository;
mod audit_log;
mod country_directory;

#[cfg(test)]
pub use applicant_command::MockApplicantCommand;
pub use applicant_command::ApplicantCommand;
#[cfg(test)]
pub use applicant_query::MockApplicantQuery;
pub use applicant_query::{ApplicantQuery, ListApplicants, SearchApplicants};
#[cfg(test)]
pub use applicant_repository::MockApplicantRepository;
pub use applicant_repository::{
    ApplicantFilter, ApplicantRepository, ApplicantRepositoryError, ApplicantUnitOfWork,
    InvalidSortField, PageWindow, SortField, SortOrder,
};
#[cfg(test)]
pub use audit_log::MockApplicantAuditLog;
pub use audit_log::ApplicantAuditLog;
#[cfg(test)]
pub use country_directory::MockCountryDirectory;
pub use country_directory::{
    Country, CountryDirectory, CountryDirectoryError, CountryVerdict, FixtureCountryDirectory,
};
