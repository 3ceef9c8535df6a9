// src/presentation/http/error.rs
use crate::application::error::BridgeError;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// A structured OAuth error response: `{error, error_description}` JSON with
/// no-store caching headers, plus an optional `WWW-Authenticate` challenge.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    description: String,
    www_authenticate: Option<String>,
}

impl HttpError {
    pub fn from_error(err: BridgeError) -> Self {
        Self {
            status: status_for(&err),
            code: err.oauth_code(),
            description: err.to_string(),
            www_authenticate: None,
        }
    }

    /// 401 challenge pointing clients at the protected-resource metadata so
    /// they can re-discover the authorize endpoint.
    pub fn unauthorized(description: impl Into<String>, resource_metadata_url: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "invalid_token",
            description: description.into(),
            www_authenticate: Some(format!(
                "Bearer resource_metadata=\"{resource_metadata_url}\""
            )),
        }
    }
}

pub fn status_for(err: &BridgeError) -> StatusCode {
    match err {
        BridgeError::InvalidRequest(_)
        | BridgeError::UnsupportedResponseType(_)
        | BridgeError::UnsupportedGrantType(_)
        | BridgeError::InvalidGrant(_) => StatusCode::BAD_REQUEST,
        BridgeError::ServerError(_) | BridgeError::Infrastructure(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        BridgeError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorBody {
            error: self.code,
            error_description: self.description,
        };

        let mut response = (self.status, Json(payload)).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CACHE_CONTROL,
            header::HeaderValue::from_static("no-store"),
        );
        headers.insert(header::PRAGMA, header::HeaderValue::from_static("no-cache"));
        if let Some(challenge) = self.www_authenticate {
            if let Ok(value) = challenge.parse() {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }
        response
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    error_description: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for Result<T, BridgeError> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
