//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{CountriesConfig, ServerConfig};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use applicant_backend::Trace;
#[cfg(debug_assertions)]
use applicant_backend::doc::ApiDoc;
use applicant_backend::inbound::http::configure_api;
use applicant_backend::inbound::http::health::{HealthState, live, ready};
use applicant_backend::inbound::http::state::HttpState;
use applicant_backend::inbound::http::validation::configure_extractors;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .configure(configure_extractors)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration, and mark the service ready once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when an adapter cannot be built or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use applicant_backend::domain::ValidationPolicy;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/health/live", StatusCode::OK)]
    #[case("/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case("/api/v1/applicants", StatusCode::OK)]
    #[case("/api/v1/countries", StatusCode::OK)]
    #[case("/api/v1/applicants/404", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn assembled_app_routes_requests(#[case] uri: &str, #[case] status: StatusCode) {
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("literal address"),
            ValidationPolicy::default(),
        );
        let http_state = web::Data::new(build_http_state(&config).expect("state"));
        let app = actix_test::init_service(build_app(
            web::Data::new(HealthState::new()),
            http_state,
        ))
        .await;

        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(response.status(), status);
        assert!(response.headers().contains_key("trace-id"));
    }
}
