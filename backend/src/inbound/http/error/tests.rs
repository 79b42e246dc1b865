//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::login_required(), StatusCode::SEE_OTHER)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn body_of(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(expected_trace_id.as_str())
    );

    let payload = body_of(response).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_details() {
    let error = Error::invalid_request("unrecognised blood type label")
        .with_details(json!({"field": "blood_type", "code": "invalid_type_label"}));

    let response = ResponseError::error_response(&error);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());

    let payload = body_of(response).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "blood_type", "code": "invalid_type_label"}))
    );
}

#[rstest]
#[actix_web::test]
async fn login_required_redirects_to_login() {
    let response = ResponseError::error_response(&Error::login_required());
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some(LOGIN_PATH)
    );

    let payload = body_of(response).await;
    assert_eq!(payload.code(), ErrorCode::LoginRequired);
}
