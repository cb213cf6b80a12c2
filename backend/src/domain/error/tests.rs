//! Tests for the domain error payload and its serialized form.

use rstest::rstest;
use serde_json::json;

use super::*;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("already completed"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("booking down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] err: Error, #[case] expected: ErrorCode) {
    assert_eq!(err.code(), expected);
}

#[rstest]
fn message_is_preserved() {
    let err = Error::invalid_request("Poll must contain at least one time slot");
    assert_eq!(err.message(), "Poll must contain at least one time slot");
    assert_eq!(err.to_string(), err.message());
}

#[rstest]
fn codes_serialize_snake_case() {
    let serialized = serde_json::to_value(ErrorCode::ServiceUnavailable).expect("serialize code");
    assert_eq!(serialized, json!("service_unavailable"));
}

#[rstest]
fn payload_omits_absent_fields() {
    let err = Error::not_found("Poll not found");
    let value = serde_json::to_value(&err).expect("serialize error");
    assert_eq!(value["code"], json!("not_found"));
    assert_eq!(value["message"], json!("Poll not found"));
    assert!(value.get("traceId").is_none());
    assert!(value.get("details").is_none());
}

#[rstest]
fn details_round_trip() {
    let err = Error::invalid_request("bad").with_details(json!({ "field": "title" }));
    let value = serde_json::to_value(&err).expect("serialize error");
    assert_eq!(value["details"]["field"], json!("title"));

    let back: Error = serde_json::from_value(value).expect("deserialize error");
    assert_eq!(back, err);
}

#[rstest]
fn trace_id_is_none_out_of_scope() {
    let err = Error::internal("boom");
    assert!(err.trace_id().is_none());
}

#[tokio::test]
async fn constructor_captures_scoped_trace_id() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid trace id");
    let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(err.trace_id(), Some(trace_id.to_string().as_str()));
}

#[rstest]
fn with_trace_id_overrides_capture() {
    let err = Error::internal("boom").with_trace_id("abc");
    assert_eq!(err.trace_id(), Some("abc"));
}
