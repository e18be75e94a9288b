//! Tests for applicant HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::{dev::ServiceResponse, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::test_utils::{api_app, fixture_state};

fn payload(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "familyName": "Rivers",
        "address": "12 Nile Street, Cairo",
        "emailAddress": email,
        "phone": "+201234567890",
        "age": 30,
        "countryOfOrigin": "Egypt",
        "appliedDate": "2024-05-01",
        "hired": false
    })
}

async fn body_json(response: ServiceResponse<impl actix_web::body::MessageBody>) -> Value {
    let bytes = actix_test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("json body")
}

#[actix_web::test]
async fn create_returns_location_and_identifier() {
    let (state, repository) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/applicants")
        .set_json(payload("Jordan", "jordan@example.com"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(location.as_deref(), Some("/api/v1/applicants/1"));
    assert_eq!(body_json(response).await, json!({"id": 1}));
    assert_eq!(repository.snapshot().await.len(), 1);
}

#[actix_web::test]
async fn duplicate_email_is_a_bad_request() {
    let (state, _) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/applicants")
            .set_json(payload("Jordan", "jordan@example.com"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), expected);
    }
}

#[rstest]
#[case(json!({"name": "Jordan"}), "Age is required")]
#[case(
    json!({"age": 30, "appliedDate": "yesterday"}),
    "appliedDate must be an RFC 3339 timestamp"
)]
#[actix_web::test]
async fn incomplete_bodies_are_rejected_before_the_pipeline(
    #[case] body: Value,
    #[case] fragment: &str,
) {
    let (state, repository) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/applicants")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains(fragment), "unexpected message: {message}");
    assert!(repository.snapshot().await.is_empty());
}

#[actix_web::test]
async fn malformed_json_renders_the_error_envelope() {
    let (state, _) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/applicants")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "invalid_request");
}

#[rstest]
#[case("/api/v1/applicants/42", StatusCode::NOT_FOUND)]
#[case("/api/v1/applicants/0", StatusCode::BAD_REQUEST)]
#[case("/api/v1/applicants/abc", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn unknown_or_malformed_ids_are_reported(#[case] uri: &str, #[case] status: StatusCode) {
    let (state, _) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), status);
}

#[actix_web::test]
async fn update_honours_the_row_version() {
    let (state, _) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    let create = actix_test::TestRequest::post()
        .uri("/api/v1/applicants")
        .set_json(payload("Jordan", "jordan@example.com"))
        .to_request();
    actix_test::call_service(&app, create).await;

    let fetched = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/applicants/1")
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = body_json(fetched).await;
    let token = fetched["rowVersion"].as_str().expect("token").to_owned();

    let mut update = payload("Morgan", "jordan@example.com");
    update["id"] = json!(1);
    update["rowVersion"] = json!(token);
    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/applicants/1")
            .set_json(&update)
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let stale = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/applicants/1")
            .set_json(&update)
            .to_request(),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(stale).await["message"],
        crate::domain::CONFLICT_MESSAGE
    );
}

#[actix_web::test]
async fn update_rejects_mismatched_identifiers() {
    let (state, _) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    let mut update = payload("Jordan", "jordan@example.com");
    update["id"] = json!(7);
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/applicants/1")
            .set_json(&update)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Applicant ID in the body does not match the URL"
    );
}

#[actix_web::test]
async fn update_of_missing_record_is_not_found() {
    let (state, _) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/applicants/9")
            .set_json(payload("Jordan", "jordan@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_requires_a_row_version_then_hides_the_record() {
    let (state, repository) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/applicants")
            .set_json(payload("Jordan", "jordan@example.com"))
            .to_request(),
    )
    .await;

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/applicants/1")
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let token = repository.snapshot().await[0]
        .row_version
        .clone()
        .expect("token")
        .to_string();
    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/applicants/1?rowVersion={token}"))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let after = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/applicants/1")
            .to_request(),
    )
    .await;
    assert_eq!(after.status(), StatusCode::NOT_FOUND);
    assert!(repository.snapshot().await[0].is_deleted);
}

#[actix_web::test]
async fn listing_search_and_filter_share_the_page_envelope() {
    let (state, _) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    for (name, email) in [
        ("Avery", "avery@example.com"),
        ("Blake", "blake@example.com"),
        ("Casey", "casey@example.com"),
    ] {
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/applicants")
                .set_json(payload(name, email))
                .to_request(),
        )
        .await;
    }

    let listed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/applicants?page=1&pageSize=2")
            .to_request(),
    )
    .await;
    let listed = body_json(listed).await;
    assert_eq!(listed["totalCount"], 3);
    assert_eq!(listed["totalPages"], 2);
    assert_eq!(listed["hasNextPage"], true);
    assert_eq!(listed["items"].as_array().map(Vec::len), Some(2));

    let searched = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/applicants/search?query=blake")
            .to_request(),
    )
    .await;
    assert_eq!(searched.status(), StatusCode::OK);
    assert_eq!(body_json(searched).await["items"][0]["name"], "Blake");

    let filtered = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/applicants/filter?sortBy=name&sortDescending=true&appliedTo=2024-05-01")
            .to_request(),
    )
    .await;
    assert_eq!(filtered.status(), StatusCode::OK);
    assert_eq!(body_json(filtered).await["items"][0]["name"], "Casey");
}

#[rstest]
#[case("/api/v1/applicants/search", "Search query is required")]
#[case(
    "/api/v1/applicants/filter?minAge=50&maxAge=40",
    "Minimum age cannot be greater than maximum age"
)]
#[case(
    "/api/v1/applicants/filter?sortBy=salary",
    "Invalid sort field: salary"
)]
#[actix_web::test]
async fn invalid_queries_are_bad_requests(#[case] uri: &str, #[case] message: &str) {
    let (state, _) = fixture_state();
    let app = actix_test::init_service(api_app(state, configure)).await;
    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], message);
}
