// src/presentation/http/controllers/token.rs
use crate::application::dto::TokenExchangeParams;
use crate::presentation::http::error::{HttpError, HttpResult};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Form, Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// `POST /token` — redeem a bridge authorization code (+ PKCE verifier) for
/// a bridge bearer token. Always answers JSON; success and failure both
/// carry no-store caching headers.
pub async fn token(
    Extension(state): Extension<HttpState>,
    Form(params): Form<TokenExchangeParams>,
) -> HttpResult<Response> {
    let issued = state
        .services
        .flow()
        .redeem_code(params)
        .await
        .map_err(HttpError::from_error)?;

    Ok((
        StatusCode::OK,
        [
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(issued),
    )
        .into_response())
}
