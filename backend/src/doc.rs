//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects the applicant, country and health endpoints together
//! with their request and response schemas. The document is served by
//! Swagger UI in debug builds and exported by `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::applicants_dto::{
    ApplicantFieldsRequest, ApplicantPageResponse, ApplicantResponse, CountryResponse,
    CreateApplicantRequest, CreatedResponse, UpdateApplicantRequest,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Applicant backend API",
        description = "CRUD, search and filtering of job applicants, with optimistic concurrency.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::applicants::list_applicants,
        crate::inbound::http::applicants::search_applicants,
        crate::inbound::http::applicants::filter_applicants,
        crate::inbound::http::applicants::get_applicant,
        crate::inbound::http::applicants::create_applicant,
        crate::inbound::http::applicants::update_applicant,
        crate::inbound::http::applicants::delete_applicant,
        crate::inbound::http::countries::list_countries,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ApplicantFieldsRequest,
        CreateApplicantRequest,
        UpdateApplicantRequest,
        ApplicantResponse,
        ApplicantPageResponse,
        CreatedResponse,
        CountryResponse,
    )),
    tags(
        (name = "applicants", description = "Applicant records"),
        (name = "countries", description = "Country directory"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema and path registration.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("ApplicantResponse", "rowVersion")]
    #[case("ApplicantResponse", "emailAddress")]
    #[case("ApplicantPageResponse", "totalCount")]
    #[case("CreatedResponse", "id")]
    fn schemas_expose_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/applicants")]
    #[case("/api/v1/applicants/search")]
    #[case("/api/v1/applicants/filter")]
    #[case("/api/v1/applicants/{id}")]
    #[case("/api/v1/countries")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
