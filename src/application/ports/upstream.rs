// src/application/ports/upstream.rs
use crate::application::BridgeResult;
use async_trait::async_trait;
use serde::Deserialize;

/// Token response from the upstream provider's `/oauth/token` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Server-to-server exchange of an upstream authorization code for an
/// upstream access token, using the bridge's own registered credentials.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn exchange_code(&self, code: &str) -> BridgeResult<UpstreamToken>;
}
