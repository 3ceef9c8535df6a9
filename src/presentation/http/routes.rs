// src/presentation/http/routes.rs
use crate::presentation::http::controllers::{authorize, callback, metadata, token};
use crate::presentation::http::extractors::ResolvedAccess;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json, Router,
    http::Method,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: HttpState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health))
        .route(
            "/.well-known/oauth-authorization-server",
            get(metadata::authorization_server),
        )
        .route(
            "/.well-known/oauth-protected-resource",
            get(metadata::protected_resource),
        )
        .route("/authorize", get(authorize::authorize))
        .route("/oauth/callback", get(callback::callback))
        .route("/token", post(token::token))
        .route("/register", post(metadata::register))
        .route("/api/ping", get(ping))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Authenticated probe: succeeds for any bearer token the resolution
/// extractor accepts (a live bridge session or a raw upstream credential).
pub async fn ping(ResolvedAccess(_credential): ResolvedAccess) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
