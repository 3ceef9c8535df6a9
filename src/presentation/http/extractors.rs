// src/presentation/http/extractors.rs
//! Bearer-token resolution for consumer-facing endpoints.
//!
//! Bridge-prefixed tokens resolve to upstream credentials through the
//! session store; unknown ones get a 401 with a `WWW-Authenticate`
//! challenge pointing at discovery. Unprefixed tokens pass through verbatim
//! (bypass mode for non-interactive callers holding a raw upstream
//! credential).

use crate::application::dto::ResolvedCredential;
use crate::presentation::http::state::HttpState;
use axum::{Extension, extract::FromRequestParts, http::request::Parts};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};

use super::error::HttpError;

#[derive(Debug, Clone)]
pub struct ResolvedAccess(pub ResolvedCredential);

impl FromRequestParts<()> for ResolvedAccess {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &()) -> Result<Self, Self::Rejection> {
        let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                HttpError::from_error(crate::application::error::BridgeError::infrastructure(
                    "application state missing",
                ))
            })?;

        let flow = app_state.services.flow();
        let metadata_url = flow.resource_metadata_url();

        let header = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| {
                HttpError::unauthorized("missing Authorization header", &metadata_url)
            })?;

        match flow
            .resolve_bearer(header.token())
            .await
            .map_err(HttpError::from_error)?
        {
            Some(credential) => Ok(Self(credential)),
            None => Err(HttpError::unauthorized(
                "unknown or expired bridge token",
                &metadata_url,
            )),
        }
    }
}
