//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::inbound::http::test_utils::MockPorts;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("pool exhausted while loading user 42")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"query": "select"}))
}

#[rstest]
#[case(Error::invalid_request("Invalid status"), StatusCode::BAD_REQUEST)]
#[case(Error::conflict("User with this email already exists"), StatusCode::BAD_REQUEST)]
#[case(Error::precondition_failed("Meeting first"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("Invalid credentials"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("Lead not found"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error envelope is JSON");
    (status, header, body)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(internal_error: Error) {
    let (status, header, body) = render(&internal_error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Internal server error",
            "code": "internal_error",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::invalid_request("Please provide a client name")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"field": "clientName"}));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body["message"], "Please provide a client name");
    assert_eq!(body["details"], json!({"field": "clientName"}));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_header() {
    let (_, header, body) = render(&Error::forbidden("denied")).await;

    assert!(header.is_none());
    assert!(body.get("traceId").is_none());
}

#[rstest]
fn redaction_preserves_trace_id(internal_error: Error) {
    let redacted = redact_if_internal(&internal_error);

    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
    assert!(redacted.details().is_none());
}

#[rstest]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
}

#[rstest]
#[actix_web::test]
async fn unknown_route_renders_envelope() {
    let app = actix_test::init_service(App::new().default_service(web::to(route_not_found))).await;
    let req = actix_test::TestRequest::get().uri("/nowhere").to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Route not found - /nowhere");
    assert_eq!(body["success"], false);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_renders_envelope() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route(
                "/echo",
                web::post().to(|body: web::Json<Value>| async move { web::Json(body.into_inner()) }),
            ),
    )
    .await;
    let req = actix_test::TestRequest::post()
        .uri("/echo")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Invalid JSON body"))
    );
}

async fn call_failing_handler(expose: bool, error: Error) -> (StatusCode, Value) {
    let state = MockPorts::default()
        .into_state()
        .exposing_internal_details(expose);
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(internal_error_details())
            .route(
                "/fail",
                web::get().to(move || {
                    let error = error.clone();
                    async move { Err::<HttpResponse, _>(error) }
                }),
            ),
    )
    .await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/fail").to_request(),
    )
    .await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn development_keeps_internal_message_and_details(internal_error: Error) {
    let (status, body) = call_failing_handler(true, internal_error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "pool exhausted while loading user 42");
    assert_eq!(body["details"], json!({"query": "select"}));
    assert_eq!(body["traceId"], TRACE_ID);
    assert_eq!(body["success"], false);
}

#[rstest]
#[actix_web::test]
async fn production_redacts_internal_errors(internal_error: Error) {
    let (status, body) = call_failing_handler(false, internal_error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
    assert!(body.get("details").is_none());
    assert_eq!(body["traceId"], TRACE_ID);
}

#[rstest]
#[actix_web::test]
async fn client_errors_pass_through_the_detail_handler() {
    let (status, body) = call_failing_handler(true, Error::not_found("Lead not found")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Lead not found");
}
