// src/presentation/http/controllers/authorize.rs
use crate::application::dto::AuthorizeParams;
use crate::presentation::http::controllers::redirect_no_store;
use crate::presentation::http::error::{HttpError, HttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, extract::Query, response::Response};

/// `GET /authorize` — start of the bridged flow. Validates the client's
/// PKCE authorization request, records it, and bounces the user agent to
/// the upstream provider. Validation failures come back as 400 JSON; no
/// error is ever forwarded to the client's redirect_uri from here.
pub async fn authorize(
    Extension(state): Extension<HttpState>,
    Query(params): Query<AuthorizeParams>,
) -> HttpResult<Response> {
    let location = state
        .services
        .flow()
        .begin_authorization(params)
        .await
        .map_err(HttpError::from_error)?;

    Ok(redirect_no_store(&location))
}
