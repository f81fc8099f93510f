#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderName, CONTENT_TYPE};
use actix_web::test;
use serde_json::Value;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

// Each test gets its own in-memory SQLite database, so multi-step flows
// commit by default. Flip per-binary via `VETO_TXN_POLICY=rollback`.
#[ctor::ctor]
fn init_txn_policy() {
    use veto_backend::db::txn_policy::{set_txn_policy, TxnPolicy};

    set_txn_policy(TxnPolicy::from_env());
}

/// Validate a problem+json error response and return its parsed body.
///
/// Checks status, content type, the `X-Trace-Id` header and that the body's
/// `trace_id` and `code` agree with it.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
) -> Value {
    assert_eq!(resp.status().as_u16(), expected_status);

    let headers = resp.headers().clone();

    let trace_hdr = HeaderName::from_static("x-trace-id");
    let trace_id = headers
        .get(&trace_hdr)
        .and_then(|v| v.to_str().ok())
        .expect("X-Trace-Id header should be present and valid UTF-8")
        .to_string();
    assert!(!trace_id.is_empty(), "X-Trace-Id header should not be empty");

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let body = test::read_body(resp).await;
    let body_str = std::str::from_utf8(&body).expect("Response body should be valid UTF-8");
    let problem: Value = serde_json::from_str(body_str).unwrap_or_else(|_| {
        panic!("Failed to parse error body as ProblemDetails. Raw body: {body_str}")
    });

    for key in ["type", "title", "status", "detail", "code", "trace_id"] {
        assert!(problem.get(key).is_some(), "{key} field should be present");
    }
    assert_eq!(problem["code"], expected_code);
    assert_eq!(problem["status"], expected_status);
    assert_eq!(problem["trace_id"], trace_id.as_str());

    let type_value = problem["type"].as_str().expect("type should be a string");
    assert_eq!(type_value, format!("https://veto.app/errors/{expected_code}"));

    problem
}

/// Like [`assert_problem`] but also pins the `detail` text.
pub async fn assert_problem_details_structure(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
    expected_detail: &str,
) {
    let problem = assert_problem(resp, expected_status, expected_code).await;
    assert_eq!(problem["detail"], expected_detail);
}
