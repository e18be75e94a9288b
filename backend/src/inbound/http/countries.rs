//! `GET /api/v1/countries`: the country directory listing.

use actix_web::{get, web};
use tracing::warn;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::applicants_dto::CountryResponse;
use crate::inbound::http::state::HttpState;

/// List every country the directory knows, sorted by name.
#[utoipa::path(
    get,
    path = "/api/v1/countries",
    responses(
        (status = 200, description = "Known countries", body = [CountryResponse]),
        (status = 503, description = "Country directory unavailable", body = Error)
    ),
    tags = ["countries"],
    operation_id = "listCountries"
)]
#[get("/countries")]
pub async fn list_countries(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<CountryResponse>>> {
    let countries = state.countries.list().await.map_err(|err| {
        warn!(error = %err, "country listing failed");
        Error::service_unavailable("Country directory is unavailable")
    })?;
    Ok(web::Json(countries.into_iter().map(CountryResponse::from).collect()))
}

/// Register the country routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_countries);
}
