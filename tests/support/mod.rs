// tests/support/mod.rs
// Shared support code for the integration test binaries. Individual test
// crates use different subsets, so allow dead_code at module level to keep
// CI output clean.
#![allow(dead_code)]

pub mod mocks;

use authbridge::application::ports::authorization::AuthorizationStore;
use authbridge::application::ports::time::Clock;
use authbridge::application::ports::upstream::UpstreamClient;
use authbridge::application::services::{ApplicationServices, AuthFlowService, FlowConfig};
use authbridge::infrastructure::stores::MemoryAuthorizationStore;
use authbridge::presentation::http::{routes::build_router, state::HttpState};
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt as _;

pub const BRIDGE_BASE: &str = "https://bridge.example";
pub const UPSTREAM_BASE: &str = "https://upstream.example";
pub const CLIENT_REDIRECT: &str = "https://client.example/oauth/done";
pub const CLIENT_STATE: &str = "client-csrf-state";
pub const UPSTREAM_ACCESS_TOKEN: &str = "upstream-access-token";

/// A PKCE verifier used across tests, with its derived S256 challenge.
pub const VERIFIER: &str = "test-verifier-test-verifier-test-verifier-test-verifier";

pub fn challenge_for(verifier: &str) -> String {
    authbridge::domain::pkce::compute_challenge(verifier)
}

pub struct TestApp {
    pub router: axum::Router,
    pub store: Arc<MemoryAuthorizationStore>,
    pub upstream: Arc<mocks::MockUpstreamClient>,
    pub clock: Arc<mocks::ManualClock>,
}

pub fn make_test_app() -> TestApp {
    let clock = mocks::ManualClock::new();
    let store = Arc::new(MemoryAuthorizationStore::new(
        Arc::clone(&clock) as Arc<dyn Clock>
    ));
    let upstream = Arc::new(mocks::MockUpstreamClient::new(UPSTREAM_ACCESS_TOKEN));

    let flow = AuthFlowService::new(
        Arc::clone(&store) as Arc<dyn AuthorizationStore>,
        Arc::clone(&upstream) as Arc<dyn UpstreamClient>,
        Arc::clone(&clock) as Arc<dyn Clock>,
        FlowConfig {
            upstream_base_url: UPSTREAM_BASE.into(),
            bridge_base_url: BRIDGE_BASE.into(),
            upstream_client_id: "bridge-client".into(),
            default_client_id: "public".into(),
        },
    );

    let services = Arc::new(ApplicationServices::new(flow));
    let router = build_router(HttpState { services });

    TestApp {
        router,
        store,
        upstream,
        clock,
    }
}

pub async fn get(app: &TestApp, uri: &str) -> Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(req).await.unwrap()
}

pub async fn get_with_bearer(app: &TestApp, uri: &str, token: &str) -> Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(req).await.unwrap()
}

pub async fn post_form(app: &TestApp, uri: &str, fields: &[(&str, &str)]) -> Response {
    let body = serde_urlencoded::to_string(fields).unwrap();
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    app.router.clone().oneshot(req).await.unwrap()
}

pub async fn post_json(app: &TestApp, uri: &str, payload: Value) -> Response {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    app.router.clone().oneshot(req).await.unwrap()
}

pub async fn body_json(resp: Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("valid json body")
}

pub async fn body_text(resp: Response) -> String {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub fn location_header(resp: &Response) -> url::Url {
    let raw = resp
        .headers()
        .get(header::LOCATION)
        .expect("Location header present")
        .to_str()
        .expect("Location header is valid utf8");
    url::Url::parse(raw).expect("Location header is a valid URL")
}

pub fn query_param(url: &url::Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Assert a structured OAuth error: expected status plus
/// `{error, error_description}` JSON.
pub async fn assert_oauth_error(resp: Response, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let json = body_json(resp).await;
    assert_eq!(
        json.get("error").and_then(Value::as_str),
        Some(expected_error)
    );
    let description = json
        .get("error_description")
        .and_then(Value::as_str)
        .unwrap_or("");
    assert!(!description.is_empty(), "expected non-empty error_description");
}

/// Default authorize query for the shared verifier/state constants.
pub fn authorize_uri() -> String {
    authorize_uri_with(&challenge_for(VERIFIER), CLIENT_STATE)
}

pub fn authorize_uri_with(challenge: &str, state: &str) -> String {
    format!(
        "/authorize?response_type=code&client_id=test-client&redirect_uri={}&code_challenge={}&code_challenge_method=S256&state={}",
        urlencode(CLIENT_REDIRECT),
        challenge,
        state,
    )
}

pub fn urlencode(value: &str) -> String {
    serde_urlencoded::to_string([("v", value)])
        .unwrap()
        .trim_start_matches("v=")
        .to_string()
}

/// Run the authorize leg and return the `state` the bridge handed to the
/// upstream provider.
pub async fn start_flow(app: &TestApp) -> String {
    let resp = get(app, &authorize_uri()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = location_header(&resp);
    query_param(&location, "state").expect("upstream state in authorize redirect")
}

/// Run authorize + callback and return the bridge authorization code
/// delivered to the client's redirect URI.
pub async fn obtain_code(app: &TestApp) -> String {
    let upstream_state = start_flow(app).await;
    let resp = get(
        app,
        &format!("/oauth/callback?code=upstream-code&state={upstream_state}"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = location_header(&resp);
    query_param(&location, "code").expect("bridge code in callback redirect")
}
