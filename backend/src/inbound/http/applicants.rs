//! Applicant HTTP handlers.
//!
//! ```text
//! GET    /api/v1/applicants?page&pageSize&searchTerm
//! GET    /api/v1/applicants/search?query&page&pageSize
//! GET    /api/v1/applicants/filter?minAge&maxAge&country&hired&appliedFrom&appliedTo&sortBy&sortDescending&includeDeleted
//! GET    /api/v1/applicants/{id}
//! POST   /api/v1/applicants
//! PUT    /api/v1/applicants/{id}
//! DELETE /api/v1/applicants/{id}?rowVersion&hardDelete&reason
//! ```
//!
//! Register `search` and `filter` before the `{id}` routes so the literal
//! segments win.

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::ports::ListApplicants;
use crate::domain::{CreateApplicant, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::applicants_dto::{
    ApplicantPageResponse, ApplicantResponse, CreateApplicantRequest, CreatedResponse,
    DeleteApplicantQuery, FilterApplicantsQuery, ListApplicantsQuery, SearchApplicantsQuery,
    UpdateApplicantRequest,
};
use crate::inbound::http::state::HttpState;

/// Base path of the applicant resource, used for `Location` headers.
pub const APPLICANTS_PATH: &str = "/api/v1/applicants";

fn not_found(id: i64) -> Error {
    Error::not_found(format!("Applicant with ID {id} not found"))
}

/// Page through live applicants, optionally narrowed by a search term.
#[utoipa::path(
    get,
    path = "/api/v1/applicants",
    params(ListApplicantsQuery),
    responses(
        (status = 200, description = "One page of applicants", body = ApplicantPageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applicants"],
    operation_id = "listApplicants"
)]
#[get("/applicants")]
pub async fn list_applicants(
    state: web::Data<HttpState>,
    query: web::Query<ListApplicantsQuery>,
) -> ApiResult<web::Json<ApplicantPageResponse>> {
    let page = state.queries.list(query.into_inner().into()).await?;
    Ok(web::Json(page.into()))
}

/// Free-text search across the text fields.
#[utoipa::path(
    get,
    path = "/api/v1/applicants/search",
    params(SearchApplicantsQuery),
    responses(
        (status = 200, description = "Matching applicants", body = ApplicantPageResponse),
        (status = 400, description = "Missing or unsafe query", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applicants"],
    operation_id = "searchApplicants"
)]
#[get("/applicants/search")]
pub async fn search_applicants(
    state: web::Data<HttpState>,
    query: web::Query<SearchApplicantsQuery>,
) -> ApiResult<web::Json<ApplicantPageResponse>> {
    let page = state.queries.search(query.into_inner().into()).await?;
    Ok(web::Json(page.into()))
}

/// Listing with every filter, sort key and the deleted-record switch.
#[utoipa::path(
    get,
    path = "/api/v1/applicants/filter",
    params(FilterApplicantsQuery),
    responses(
        (status = 200, description = "Matching applicants", body = ApplicantPageResponse),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applicants"],
    operation_id = "filterApplicants"
)]
#[get("/applicants/filter")]
pub async fn filter_applicants(
    state: web::Data<HttpState>,
    query: web::Query<FilterApplicantsQuery>,
) -> ApiResult<web::Json<ApplicantPageResponse>> {
    let options = ListApplicants::try_from(query.into_inner())?;
    let page = state.queries.list(options).await?;
    Ok(web::Json(page.into()))
}

/// Fetch one live applicant.
#[utoipa::path(
    get,
    path = "/api/v1/applicants/{id}",
    params(("id" = i64, Path, description = "Applicant identifier")),
    responses(
        (status = 200, description = "Applicant", body = ApplicantResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "No live applicant with this identifier", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applicants"],
    operation_id = "getApplicant"
)]
#[get("/applicants/{id}")]
pub async fn get_applicant(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ApplicantResponse>> {
    let id = path.into_inner();
    let found = state.queries.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(web::Json(found.into()))
}

/// Create an applicant.
#[utoipa::path(
    post,
    path = "/api/v1/applicants",
    request_body = CreateApplicantRequest,
    responses(
        (status = 201, description = "Created", body = CreatedResponse,
            headers(("Location" = String, description = "URL of the new applicant"))),
        (status = 400, description = "Validation, security or business rule rejection", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applicants"],
    operation_id = "createApplicant"
)]
#[post("/applicants")]
pub async fn create_applicant(
    state: web::Data<HttpState>,
    payload: web::Json<CreateApplicantRequest>,
) -> ApiResult<HttpResponse> {
    let command = CreateApplicant::try_from(payload.into_inner())?;
    let id = state.commands.create(command).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("{APPLICANTS_PATH}/{id}")))
        .json(CreatedResponse { id: id.get() }))
}

/// Replace an applicant's attributes.
#[utoipa::path(
    put,
    path = "/api/v1/applicants/{id}",
    params(("id" = i64, Path, description = "Applicant identifier")),
    request_body = UpdateApplicantRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Rejected, or body and path identifiers differ", body = Error),
        (status = 404, description = "No live applicant with this identifier", body = Error),
        (status = 409, description = "Row version is stale", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applicants"],
    operation_id = "updateApplicant"
)]
#[put("/applicants/{id}")]
pub async fn update_applicant(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateApplicantRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let command = payload.into_inner().into_command(id)?;
    if state.commands.update(command).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(not_found(id))
    }
}

/// Soft or hard delete an applicant.
#[utoipa::path(
    delete,
    path = "/api/v1/applicants/{id}",
    params(("id" = i64, Path, description = "Applicant identifier"), DeleteApplicantQuery),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Missing row version or rejected reason", body = Error),
        (status = 404, description = "No live applicant with this identifier", body = Error),
        (status = 409, description = "Row version is stale", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["applicants"],
    operation_id = "deleteApplicant"
)]
#[delete("/applicants/{id}")]
pub async fn delete_applicant(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<DeleteApplicantQuery>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let command = query.into_inner().into_command(id)?;
    if state.commands.delete(command).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(not_found(id))
    }
}

/// Register the applicant routes in matching order.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_applicants)
        .service(search_applicants)
        .service(filter_applicants)
        .service(get_applicant)
        .service(create_applicant)
        .service(update_applicant)
        .service(delete_applicant);
}

#[cfg(test)]
#[path = "applicants_tests.rs"]
mod tests;
