// src/application/dto.rs
use serde::{Deserialize, Serialize};

/// Query parameters of `GET /authorize`. Everything is optional at the
/// transport layer; the flow service enforces presence with distinct errors.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthorizeParams {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub state: Option<String>,
    pub scope: Option<String>,
}

/// Query parameters of the upstream provider's redirect back to the bridge.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Form body of `POST /token`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TokenExchangeParams {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    pub redirect_uri: Option<String>,
}

/// Successful token endpoint response body.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
}

/// Outcome of resolving an inbound bearer token.
#[derive(Debug, Clone)]
pub enum ResolvedCredential {
    /// A bridge-issued token that mapped to a live session; downstream
    /// calls use the upstream credential it resolves to.
    Bridged { upstream_token: String },
    /// A token without the bridge prefix, forwarded verbatim as a raw
    /// upstream credential (bypass mode for non-interactive callers).
    Passthrough { token: String },
}

impl ResolvedCredential {
    /// The credential presented to the upstream API on behalf of the caller.
    pub fn upstream_credential(&self) -> &str {
        match self {
            Self::Bridged { upstream_token } => upstream_token,
            Self::Passthrough { token } => token,
        }
    }
}
