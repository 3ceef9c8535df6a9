// src/presentation/http/controllers/mod.rs
pub mod authorize;
pub mod callback;
pub mod metadata;
pub mod token;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// 302 with `Cache-Control: no-store`; both browser-facing legs of the flow
/// redirect this way so intermediaries never cache a one-time location.
pub(crate) fn redirect_no_store(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location),
            (header::CACHE_CONTROL, "no-store"),
        ],
    )
        .into_response()
}
