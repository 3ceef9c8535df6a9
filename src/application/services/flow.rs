// src/application/services/flow.rs
//! The three-legged authorization state machine:
//! pending authorization -> authorization code -> session.
//!
//! Each stage consumes the record produced by the previous one, so stages of
//! a single flow are strictly sequential while unrelated flows never
//! interact. All single-use consumption goes through the store's atomic
//! `take_*` operations.

use crate::application::dto::{
    AuthorizeParams, ResolvedCredential, TokenExchangeParams, TokenResponse,
};
use crate::application::error::{BridgeError, BridgeResult};
use crate::application::ports::authorization::{
    AUTHORIZATION_CODE_TTL, AuthorizationCode, PENDING_AUTHORIZATION_TTL, PendingAuthorization,
    SESSION_TOKEN_PREFIX, SESSION_TTL, Session,
};
use crate::application::ports::{AuthorizationStorePort, ClockPort, UpstreamClientPort};
use crate::domain::pkce;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Scope advertised in discovery metadata and echoed on minted tokens. The
/// bridge only re-issues "log in as the user who completed the upstream
/// flow"; it does not manage finer-grained scopes.
pub const LOGIN_SCOPE: &str = "login";

/// Static configuration of the flow service, derived from [`crate::config::AppConfig`]
/// at wiring time so the service itself stays environment-agnostic.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Base URL of the upstream provider (its `/oauth/authorize` and
    /// `/oauth/token` endpoints hang off this).
    pub upstream_base_url: String,
    /// The bridge's own externally visible base URL.
    pub bridge_base_url: String,
    /// Client id the bridge is registered under at the upstream provider.
    pub upstream_client_id: String,
    /// Client id recorded when the inbound request omits one.
    pub default_client_id: String,
}

pub struct AuthFlowService {
    store: Arc<AuthorizationStorePort>,
    upstream: Arc<UpstreamClientPort>,
    clock: Arc<ClockPort>,
    config: FlowConfig,
}

impl AuthFlowService {
    pub fn new(
        store: Arc<AuthorizationStorePort>,
        upstream: Arc<UpstreamClientPort>,
        clock: Arc<ClockPort>,
        config: FlowConfig,
    ) -> Self {
        Self {
            store,
            upstream,
            clock,
            config,
        }
    }

    /// Issuer identifier used in discovery metadata.
    pub fn issuer(&self) -> &str {
        self.config.bridge_base_url.trim_end_matches('/')
    }

    /// The upstream provider redirects the user agent back here.
    pub fn callback_url(&self) -> String {
        format!("{}/oauth/callback", self.issuer())
    }

    /// Advertised in `WWW-Authenticate` challenges so standards-compliant
    /// clients can re-discover the authorize endpoint.
    pub fn resource_metadata_url(&self) -> String {
        format!("{}/.well-known/oauth-protected-resource", self.issuer())
    }

    /// Stage one: validate an inbound authorization request, persist a
    /// pending authorization, and return the upstream authorize URL the
    /// user agent must be redirected to.
    pub async fn begin_authorization(&self, params: AuthorizeParams) -> BridgeResult<String> {
        if params.response_type.as_deref() != Some("code") {
            return Err(BridgeError::unsupported_response_type(
                "only response_type=code is supported",
            ));
        }

        let redirect_uri = params
            .redirect_uri
            .as_deref()
            .ok_or_else(|| BridgeError::invalid_request("redirect_uri is required"))?;
        if !is_valid_redirect_uri(redirect_uri) {
            return Err(BridgeError::invalid_request(
                "redirect_uri must be https or localhost",
            ));
        }

        let code_challenge = params
            .code_challenge
            .as_deref()
            .ok_or_else(|| BridgeError::invalid_request("code_challenge is required"))?;
        if !pkce::is_valid_challenge(code_challenge) {
            return Err(BridgeError::invalid_request("invalid code_challenge format"));
        }

        let code_challenge_method = params
            .code_challenge_method
            .as_deref()
            .ok_or_else(|| BridgeError::invalid_request("code_challenge_method is required"))?;
        if code_challenge_method != pkce::METHOD_S256 {
            return Err(BridgeError::invalid_request(
                "code_challenge_method must be S256",
            ));
        }

        let bridge_state = params
            .state
            .as_deref()
            .ok_or_else(|| BridgeError::invalid_request("state is required"))?;

        let upstream_state = fresh_state();
        let pending = PendingAuthorization {
            bridge_state: bridge_state.to_string(),
            upstream_state: upstream_state.clone(),
            code_challenge: code_challenge.to_string(),
            code_challenge_method: code_challenge_method.to_string(),
            redirect_uri: redirect_uri.to_string(),
            client_id: params
                .client_id
                .clone()
                .unwrap_or_else(|| self.config.default_client_id.clone()),
            created_at: self.clock.now(),
        };
        self.store
            .put_pending(pending, PENDING_AUTHORIZATION_TTL)
            .await?;

        info!(client_redirect = %redirect_uri, "authorization flow started");
        self.upstream_authorize_url(&upstream_state)
    }

    /// Stage two: the upstream provider redirected back to us. Consume the
    /// pending authorization, exchange the upstream code, persist a bridge
    /// authorization code, and return the URL of the original client's
    /// callback.
    ///
    /// The pending record is taken before anything else, so a failed
    /// exchange (or a missing `code`) burns the flow; the client must
    /// restart from `/authorize`.
    pub async fn complete_callback(
        &self,
        code: Option<&str>,
        upstream_state: Option<&str>,
    ) -> BridgeResult<String> {
        let upstream_state = upstream_state
            .ok_or_else(|| BridgeError::invalid_request("missing state parameter"))?;

        let pending = self
            .store
            .take_pending(upstream_state)
            .await?
            .ok_or_else(|| BridgeError::invalid_request("invalid or expired state"))?;

        let code = code
            .ok_or_else(|| BridgeError::invalid_request("missing authorization code"))?;

        let upstream_token = match self.upstream.exchange_code(code).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "upstream token exchange failed");
                return Err(BridgeError::server_error("failed to complete authorization"));
            }
        };

        let bridge_code = fresh_code();
        let record = AuthorizationCode {
            code: bridge_code.clone(),
            upstream_access_token: upstream_token.access_token,
            code_challenge: pending.code_challenge,
            code_challenge_method: pending.code_challenge_method,
            redirect_uri: pending.redirect_uri.clone(),
            created_at: self.clock.now(),
        };
        self.store.put_code(record, AUTHORIZATION_CODE_TTL).await?;

        let mut location = Url::parse(&pending.redirect_uri)
            .map_err(|err| BridgeError::infrastructure(format!("stored redirect_uri: {err}")))?;
        location
            .query_pairs_mut()
            .append_pair("code", &bridge_code)
            .append_pair("state", &pending.bridge_state);

        info!("authorization code issued");
        Ok(location.into())
    }

    /// Stage three: redeem a bridge authorization code (+ PKCE verifier) for
    /// a bridge session token.
    ///
    /// The code is taken from the store before the redirect-uri and PKCE
    /// checks run: any failed attempt consumes it, so a replay with the
    /// correct verifier cannot succeed afterwards.
    pub async fn redeem_code(&self, params: TokenExchangeParams) -> BridgeResult<TokenResponse> {
        if params.grant_type.as_deref() != Some("authorization_code") {
            return Err(BridgeError::unsupported_grant_type(
                "only grant_type=authorization_code is supported",
            ));
        }

        let code = params
            .code
            .as_deref()
            .ok_or_else(|| BridgeError::invalid_request("code is required"))?;
        let code_verifier = params
            .code_verifier
            .as_deref()
            .ok_or_else(|| BridgeError::invalid_request("code_verifier is required"))?;

        let record = self
            .store
            .take_code(code)
            .await?
            .ok_or_else(|| BridgeError::invalid_grant("invalid or expired authorization code"))?;

        if let Some(redirect_uri) = params.redirect_uri.as_deref() {
            if redirect_uri != record.redirect_uri {
                debug!("token exchange rejected: redirect_uri mismatch");
                return Err(BridgeError::invalid_grant("redirect_uri mismatch"));
            }
        }

        if !pkce::validate(
            code_verifier,
            &record.code_challenge,
            &record.code_challenge_method,
        ) {
            debug!("token exchange rejected: PKCE validation failed");
            return Err(BridgeError::invalid_grant("invalid code_verifier"));
        }

        let token = fresh_token();
        let session = Session {
            token: token.clone(),
            upstream_access_token: record.upstream_access_token,
            created_at: self.clock.now(),
        };
        self.store.put_session(session, SESSION_TTL).await?;

        info!("session minted");
        Ok(TokenResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            scope: LOGIN_SCOPE.to_string(),
        })
    }

    /// Resolve an inbound bearer token. Bridge-prefixed tokens are looked up
    /// as sessions (`None` when absent or expired); anything else passes
    /// through verbatim as a raw upstream credential.
    pub async fn resolve_bearer(
        &self,
        bearer: &str,
    ) -> BridgeResult<Option<ResolvedCredential>> {
        if !bearer.starts_with(SESSION_TOKEN_PREFIX) {
            debug!("bearer token without bridge prefix, passing through");
            return Ok(Some(ResolvedCredential::Passthrough {
                token: bearer.to_string(),
            }));
        }

        match self.store.get_session(bearer).await? {
            Some(session) => Ok(Some(ResolvedCredential::Bridged {
                upstream_token: session.upstream_access_token,
            })),
            None => Ok(None),
        }
    }

    fn upstream_authorize_url(&self, upstream_state: &str) -> BridgeResult<String> {
        let base = self.config.upstream_base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/oauth/authorize"))
            .map_err(|err| BridgeError::infrastructure(format!("upstream base URL: {err}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.upstream_client_id)
            .append_pair("redirect_uri", &self.callback_url())
            .append_pair("response_type", "code")
            .append_pair("state", upstream_state);
        Ok(url.into())
    }
}

/// Correlation key for the upstream leg; 32+ characters of opaque entropy.
fn fresh_state() -> String {
    Uuid::new_v4().simple().to_string()
}

fn fresh_code() -> String {
    Uuid::new_v4().simple().to_string()
}

fn fresh_token() -> String {
    format!("{}{}", SESSION_TOKEN_PREFIX, Uuid::new_v4().simple())
}

/// Clients may register https callbacks, or plain http only on loopback
/// hosts (local development).
fn is_valid_redirect_uri(uri: &str) -> bool {
    match Url::parse(uri) {
        Ok(url) => match url.scheme() {
            "https" => true,
            "http" => matches!(url.host_str(), Some("localhost") | Some("127.0.0.1")),
            _ => false,
        },
        Err(_) => false,
    }
}
