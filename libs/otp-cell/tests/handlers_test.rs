use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use otp_cell::{otp_routes, OtpState, OtpStore};
use shared_upstream::AppState;
use shared_utils::test_utils::{
    MockBull36Responses, TestConfig, TEST_DEFAULT_TOKEN, TEST_SECOND_TOKEN, TEST_SECOND_USER,
};

const PHONE: &str = "0812345678";

fn create_test_state(base_url: &str) -> OtpState {
    let config = TestConfig::with_base_url(base_url).to_arc();
    let store = Arc::new(OtpStore::from_config(&config).unwrap());
    OtpState::new(AppState::new(config).unwrap(), store)
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn send(state: &OtpState) -> (StatusCode, Value) {
    post(otp_routes(state.clone()), "/send_otp", json!({"phone": PHONE})).await
}

async fn verify(state: &OtpState, otp: Value) -> (StatusCode, Value) {
    post(otp_routes(state.clone()), "/verify_otp", json!({"phone": PHONE, "otp": otp})).await
}

fn send_otp_reply(otp: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(MockBull36Responses::send_otp(json!(otp), None))
}

async fn mount_send_otp(server: &MockServer, reply: Value) {
    Mock::given(method("GET"))
        .and(path("/send_otp"))
        .and(query_param("phone", PHONE))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_send_otp_hides_code_and_returns_customer_id() {
    let server = MockServer::start().await;
    mount_send_otp(&server, MockBull36Responses::send_otp(json!("1234"), Some("C-900"))).await;
    let state = create_test_state(&server.uri());

    let (status, body) = send(&state).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["customerId"], "C-900");
    assert!(body.get("otp").is_none());
    assert!(!body.to_string().contains("1234"));
    assert!(state.store.contains(PHONE).await);
}

#[tokio::test]
async fn test_send_otp_reads_code_nested_under_data() {
    let server = MockServer::start().await;
    mount_send_otp(&server, json!({"success": 1, "data": {"otp": 5678, "cust_id": 31}})).await;
    let state = create_test_state(&server.uri());

    let (status, body) = send(&state).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customerId"], "31");

    let (status, body) = verify(&state, json!("5678")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customerId"], "31");
}

#[tokio::test]
async fn test_send_otp_upstream_failure_creates_no_record() {
    let server = MockServer::start().await;
    mount_send_otp(&server, MockBull36Responses::failure("Phone number is blocked")).await;
    let state = create_test_state(&server.uri());

    let (status, body) = send(&state).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Phone number is blocked");
    assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn test_send_otp_unreachable_upstream_is_500_with_error_text() {
    let state = create_test_state("http://127.0.0.1:9");

    let (status, body) = send(&state).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to send OTP");
    assert!(body["error"].as_str().is_some());
    assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn test_send_otp_requires_phone() {
    let state = create_test_state("http://127.0.0.1:9");

    let (status, body) = post(otp_routes(state), "/send_otp", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Phone number is required");
}

#[tokio::test]
async fn test_send_otp_uses_token_of_switched_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/send_otp"))
        .and(query_param("token", TEST_SECOND_TOKEN))
        .and(query_param("user_id", "202"))
        .respond_with(send_otp_reply("1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("token", TEST_DEFAULT_TOKEN))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let state = create_test_state(&server.uri());
    assert!(state.app.registry.switch_user(TEST_SECOND_USER).await);

    let (status, _) = send(&state).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_verify_before_send_is_not_found() {
    let state = create_test_state("http://127.0.0.1:9");

    let (status, body) = verify(&state, json!("1234")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "OTP not found");
}

#[tokio::test]
async fn test_verify_consumes_record_on_success() {
    let server = MockServer::start().await;
    mount_send_otp(&server, MockBull36Responses::send_otp(json!("1234"), Some("C-1"))).await;
    let state = create_test_state(&server.uri());

    send(&state).await;

    let (status, body) = verify(&state, json!("1234")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["customerId"], "C-1");
    assert!(body["verifiedAt"].as_str().is_some());

    let (status, body) = verify(&state, json!("1234")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "OTP not found");
}

#[tokio::test]
async fn test_wrong_code_does_not_consume_record() {
    let server = MockServer::start().await;
    mount_send_otp(&server, MockBull36Responses::send_otp(json!(1234), None)).await;
    let state = create_test_state(&server.uri());

    send(&state).await;

    let (status, body) = verify(&state, json!("0000")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Incorrect OTP");
    assert!(state.store.contains(PHONE).await);

    let (status, body) = verify(&state, json!(1234)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["customerId"].as_str().unwrap().starts_with("CUST_"));
}

#[tokio::test]
async fn test_second_send_invalidates_first_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/send_otp"))
        .respond_with(send_otp_reply("1111"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/send_otp"))
        .respond_with(send_otp_reply("2222"))
        .mount(&server)
        .await;
    let state = create_test_state(&server.uri());

    send(&state).await;
    send(&state).await;

    let (status, body) = verify(&state, json!("1111")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Incorrect OTP");

    let (status, _) = verify(&state, json!("2222")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_verify_requires_phone_and_code() {
    let state = create_test_state("http://127.0.0.1:9");

    let (status, body) = post(otp_routes(state), "/verify_otp", json!({"phone": PHONE})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Phone number and OTP are required");
}

#[tokio::test]
async fn test_malformed_body_gets_error_envelope() {
    let state = create_test_state("http://127.0.0.1:9");

    let (status, body) =
        post(otp_routes(state.clone()), "/send_otp", json!({"phone": 812345678})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));

    let request = Request::builder()
        .method("POST")
        .uri("/verify_otp")
        .body(Body::from(json!({"phone": PHONE, "otp": "1"}).to_string()))
        .unwrap();
    let response = otp_routes(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}
