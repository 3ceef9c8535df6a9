// src/application/error.rs
use thiserror::Error;

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failure taxonomy of the authorization bridge. The first four variants map
/// one-to-one onto OAuth error codes returned to clients; the rest cover
/// upstream and backend failures that must never leak as transport panics.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    UnsupportedResponseType(String),

    #[error("{0}")]
    UnsupportedGrantType(String),

    #[error("{0}")]
    InvalidGrant(String),

    #[error("upstream exchange failed: {0}")]
    ServerError(String),

    #[error("storage backend unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl BridgeError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn unsupported_response_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedResponseType(msg.into())
    }

    pub fn unsupported_grant_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedGrantType(msg.into())
    }

    pub fn invalid_grant(msg: impl Into<String>) -> Self {
        Self::InvalidGrant(msg.into())
    }

    pub fn server_error(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// The OAuth error code serialized into `{"error": ...}` bodies and
    /// rendered on callback failure pages.
    pub fn oauth_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnsupportedResponseType(_) => "unsupported_response_type",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::InvalidGrant(_) => "invalid_grant",
            Self::ServerError(_) | Self::Infrastructure(_) => "server_error",
            Self::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}
