// src/config.rs
use std::{env, time::Duration};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    listen_addr: String,
    upstream_client_id: String,
    upstream_client_secret: String,
    upstream_base_url: String,
    bridge_base_url: String,
    default_client_id: String,
    store_redis_url: Option<String>,
    store_namespace: String,
    require_shared_store: bool,
    upstream_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_store_namespace() -> String {
    "authbridge".into()
}

fn default_upstream_timeout_secs() -> u64 {
    15
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates required keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| default_listen_addr());

        let upstream_client_id = env::var("UPSTREAM_OAUTH_CLIENT_ID")
            .map_err(|_| ConfigError::Missing("UPSTREAM_OAUTH_CLIENT_ID"))?;
        let upstream_client_secret = env::var("UPSTREAM_OAUTH_CLIENT_SECRET")
            .map_err(|_| ConfigError::Missing("UPSTREAM_OAUTH_CLIENT_SECRET"))?;
        let upstream_base_url = env::var("UPSTREAM_BASE_URL")
            .map_err(|_| ConfigError::Missing("UPSTREAM_BASE_URL"))?;

        if !upstream_base_url.starts_with("http://") && !upstream_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "UPSTREAM_BASE_URL must be an http(s) URL".into(),
            ));
        }

        let bridge_base_url =
            env::var("BRIDGE_BASE_URL").unwrap_or_else(|_| format!("http://{listen_addr}"));

        let default_client_id = env::var("DEFAULT_CLIENT_ID").unwrap_or_else(|_| "public".into());

        let store_redis_url = env::var("STORE_REDIS_URL").ok().filter(|v| !v.is_empty());

        let store_namespace =
            env::var("STORE_NAMESPACE").unwrap_or_else(|_| default_store_namespace());

        let require_shared_store = env::var("BRIDGE_REQUIRE_SHARED_STORE")
            .ok()
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let upstream_timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(default_upstream_timeout_secs);

        Ok(Self {
            listen_addr,
            upstream_client_id,
            upstream_client_secret,
            upstream_base_url,
            bridge_base_url,
            default_client_id,
            store_redis_url,
            store_namespace,
            require_shared_store,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn upstream_client_id(&self) -> &str {
        &self.upstream_client_id
    }

    pub fn upstream_client_secret(&self) -> &str {
        &self.upstream_client_secret
    }

    /// Base URL of the upstream provider, e.g. `https://app.example-bank.com`.
    pub fn upstream_base_url(&self) -> &str {
        &self.upstream_base_url
    }

    /// Externally visible base URL of this bridge. The upstream provider
    /// redirects back to `{bridge_base_url}/oauth/callback`.
    pub fn bridge_base_url(&self) -> &str {
        &self.bridge_base_url
    }

    /// Client id assigned when the client omits one (public clients).
    pub fn default_client_id(&self) -> &str {
        &self.default_client_id
    }

    pub fn store_redis_url(&self) -> Option<&str> {
        self.store_redis_url.as_deref()
    }

    /// Key prefix separating deployments that share one Redis instance.
    pub fn store_namespace(&self) -> &str {
        &self.store_namespace
    }

    /// When true, refuse to start without a shared store. Horizontally
    /// scaled deployments lose in-flight flows whose callback lands on a
    /// different instance than the one that created the pending record.
    pub fn require_shared_store(&self) -> bool {
        self.require_shared_store
    }

    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }
}
