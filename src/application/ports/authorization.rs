// src/application/ports/authorization.rs
use crate::application::BridgeResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a flow may sit between `/authorize` and the upstream callback.
pub const PENDING_AUTHORIZATION_TTL: Duration = Duration::from_secs(10 * 60);
/// How long a bridge authorization code stays redeemable.
pub const AUTHORIZATION_CODE_TTL: Duration = Duration::from_secs(5 * 60);
/// Lifetime of a minted session.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Prefix marking bearer tokens as bridge-issued. Anything else presented in
/// an `Authorization` header is treated as a raw upstream credential.
pub const SESSION_TOKEN_PREFIX: &str = "brg_";

/// An in-flight authorization: created by `/authorize`, consumed exactly
/// once by the upstream callback. Keyed by `upstream_state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAuthorization {
    /// The client's own CSRF token, restored on the redirect back to it.
    pub bridge_state: String,
    /// Bridge-generated correlation key sent to the upstream provider.
    pub upstream_state: String,
    pub code_challenge: String,
    pub code_challenge_method: String,
    pub redirect_uri: String,
    pub client_id: String,
    pub created_at: DateTime<Utc>,
}

/// A bridge-issued authorization code, bound to the upstream credential it
/// was exchanged for. Keyed by `code`; consumed exactly once, on success or
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationCode {
    pub code: String,
    pub upstream_access_token: String,
    pub code_challenge: String,
    pub code_challenge_method: String,
    pub redirect_uri: String,
    pub created_at: DateTime<Utc>,
}

/// A minted bridge session. Keyed by `token` (carries
/// [`SESSION_TOKEN_PREFIX`]); read-many, deleted only by expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub upstream_access_token: String,
    pub created_at: DateTime<Utc>,
}

/// Keyed, TTL-bounded persistence for the three flow record kinds.
///
/// `take_*` is an atomic get-and-delete: when two callers race on the same
/// key, exactly one observes the record and the other observes `None`. That
/// is the property single-use redemption rests on; a check-then-delete pair
/// is not an acceptable implementation.
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
    async fn put_pending(
        &self,
        record: PendingAuthorization,
        ttl: Duration,
    ) -> BridgeResult<()>;
    async fn get_pending(&self, upstream_state: &str)
        -> BridgeResult<Option<PendingAuthorization>>;
    async fn take_pending(
        &self,
        upstream_state: &str,
    ) -> BridgeResult<Option<PendingAuthorization>>;
    async fn delete_pending(&self, upstream_state: &str) -> BridgeResult<()>;

    async fn put_code(&self, record: AuthorizationCode, ttl: Duration) -> BridgeResult<()>;
    async fn get_code(&self, code: &str) -> BridgeResult<Option<AuthorizationCode>>;
    async fn take_code(&self, code: &str) -> BridgeResult<Option<AuthorizationCode>>;
    async fn delete_code(&self, code: &str) -> BridgeResult<()>;

    async fn put_session(&self, record: Session, ttl: Duration) -> BridgeResult<()>;
    async fn get_session(&self, token: &str) -> BridgeResult<Option<Session>>;
    async fn delete_session(&self, token: &str) -> BridgeResult<()>;
}
