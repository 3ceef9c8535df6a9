// tests/e2e_token.rs
mod support;

use axum::http::{StatusCode, header};
use serde_json::Value;
use support::*;

#[tokio::test]
async fn token_exchange_mints_a_bridge_session() {
    let app = make_test_app();
    let code = obtain_code(&app).await;

    let resp = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "authorization_code"),
            ("code", &code),
            ("code_verifier", VERIFIER),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cache_control = resp
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(cache_control.contains("no-store"));
    assert_eq!(
        resp.headers().get(header::PRAGMA).and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );

    let json = body_json(resp).await;
    let access_token = json
        .get("access_token")
        .and_then(Value::as_str)
        .expect("access_token");
    assert!(access_token.starts_with("brg_"), "token: {access_token}");
    assert_ne!(access_token, UPSTREAM_ACCESS_TOKEN);
    assert_eq!(json.get("token_type").and_then(Value::as_str), Some("Bearer"));
    assert_eq!(json.get("scope").and_then(Value::as_str), Some("login"));
}

#[tokio::test]
async fn code_cannot_be_redeemed_twice() {
    let app = make_test_app();
    let code = obtain_code(&app).await;
    let fields = [
        ("grant_type", "authorization_code"),
        ("code", code.as_str()),
        ("code_verifier", VERIFIER),
    ];

    let first = post_form(&app, "/token", &fields).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_form(&app, "/token", &fields).await;
    assert_oauth_error(second, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn failed_pkce_attempt_consumes_the_code() {
    let app = make_test_app();
    let code = obtain_code(&app).await;

    let wrong = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("code_verifier", "wrong-verifier-wrong-verifier-wrong-verifier"),
        ],
    )
    .await;
    assert_oauth_error(wrong, StatusCode::BAD_REQUEST, "invalid_grant").await;

    // Even the correct verifier cannot rescue a burned code.
    let correct = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("code_verifier", VERIFIER),
        ],
    )
    .await;
    assert_oauth_error(correct, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn rejects_unknown_grant_type() {
    let app = make_test_app();

    let resp = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "client_credentials"),
            ("code", "whatever"),
            ("code_verifier", VERIFIER),
        ],
    )
    .await;
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "unsupported_grant_type").await;
}

#[tokio::test]
async fn rejects_missing_code_and_verifier() {
    let app = make_test_app();

    let no_code = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "authorization_code"),
            ("code_verifier", VERIFIER),
        ],
    )
    .await;
    assert_oauth_error(no_code, StatusCode::BAD_REQUEST, "invalid_request").await;

    let code = obtain_code(&app).await;
    let no_verifier = post_form(
        &app,
        "/token",
        &[("grant_type", "authorization_code"), ("code", code.as_str())],
    )
    .await;
    assert_oauth_error(no_verifier, StatusCode::BAD_REQUEST, "invalid_request").await;

    // The missing-verifier request was rejected before the store lookup, so
    // the code survives and a complete request still works.
    let complete = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("code_verifier", VERIFIER),
        ],
    )
    .await;
    assert_eq!(complete.status(), StatusCode::OK);
}

#[tokio::test]
async fn rejects_unknown_code() {
    let app = make_test_app();

    let resp = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "authorization_code"),
            ("code", "never-issued"),
            ("code_verifier", VERIFIER),
        ],
    )
    .await;
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn rejects_redirect_uri_mismatch() {
    let app = make_test_app();
    let code = obtain_code(&app).await;

    let resp = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("code_verifier", VERIFIER),
            ("redirect_uri", "https://evil.example/cb"),
        ],
    )
    .await;
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}

#[tokio::test]
async fn accepts_matching_redirect_uri() {
    let app = make_test_app();
    let code = obtain_code(&app).await;

    let resp = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("code_verifier", VERIFIER),
            ("redirect_uri", CLIENT_REDIRECT),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_code_is_rejected() {
    let app = make_test_app();
    let code = obtain_code(&app).await;

    app.clock.advance(chrono::Duration::minutes(6));

    let resp = post_form(
        &app,
        "/token",
        &[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("code_verifier", VERIFIER),
        ],
    )
    .await;
    assert_oauth_error(resp, StatusCode::BAD_REQUEST, "invalid_grant").await;
}
