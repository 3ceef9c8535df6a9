// src/presentation/http/controllers/metadata.rs
//! Discovery documents (RFC 8414 / RFC 9728) and dynamic client
//! registration (RFC 7591). Stateless; everything derives from the bridge's
//! base URL.

use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AuthorizationServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub registration_endpoint: String,
    pub scopes_supported: Vec<String>,
    pub response_types_supported: Vec<String>,
    pub response_modes_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
}

/// `GET /.well-known/oauth-authorization-server`
pub async fn authorization_server(
    Extension(state): Extension<HttpState>,
) -> Json<AuthorizationServerMetadata> {
    let base = state.services.flow().issuer().to_string();

    Json(AuthorizationServerMetadata {
        issuer: base.clone(),
        authorization_endpoint: format!("{base}/authorize"),
        token_endpoint: format!("{base}/token"),
        registration_endpoint: format!("{base}/register"),
        scopes_supported: vec!["login".into()],
        response_types_supported: vec!["code".into()],
        response_modes_supported: vec!["query".into()],
        grant_types_supported: vec!["authorization_code".into()],
        code_challenge_methods_supported: vec!["S256".into()],
        token_endpoint_auth_methods_supported: vec!["none".into()],
    })
}

#[derive(Debug, Serialize)]
pub struct ProtectedResourceMetadata {
    pub resource: String,
    pub authorization_servers: Vec<String>,
    pub bearer_methods_supported: Vec<String>,
}

/// `GET /.well-known/oauth-protected-resource`
pub async fn protected_resource(
    Extension(state): Extension<HttpState>,
) -> Json<ProtectedResourceMetadata> {
    let base = state.services.flow().issuer().to_string();

    Json(ProtectedResourceMetadata {
        resource: base.clone(),
        authorization_servers: vec![base],
        bearer_methods_supported: vec!["header".into()],
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub redirect_uris: Option<Vec<String>>,
    #[serde(default)]
    pub client_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub client_id: String,
    pub client_id_issued_at: i64,
    pub token_endpoint_auth_method: String,
    pub grant_types: Vec<String>,
    pub response_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uris: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

/// `POST /register` — stateless RFC 7591 echo. The bridge treats every
/// client as public, so registration just hands out a fresh identifier.
pub async fn register(
    payload: Option<Json<RegisterRequest>>,
) -> (StatusCode, Json<RegisterResponse>) {
    let request = payload.map(|Json(body)| body).unwrap_or_default();

    let response = RegisterResponse {
        client_id: Uuid::new_v4().to_string(),
        client_id_issued_at: chrono::Utc::now().timestamp(),
        token_endpoint_auth_method: "none".into(),
        grant_types: vec!["authorization_code".into()],
        response_types: vec!["code".into()],
        redirect_uris: request.redirect_uris,
        client_name: request.client_name,
    };

    (StatusCode::CREATED, Json(response))
}
