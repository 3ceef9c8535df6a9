// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use std::sync::Arc;

/// Shared handler state, injected as an axum `Extension`. Cloning is an
/// `Arc` bump; the flow service inside is wired once at startup.
#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
}
