// src/infrastructure/upstream.rs
//! Server-to-server client for the upstream provider's token endpoint.

use crate::application::BridgeResult;
use crate::application::error::BridgeError;
use crate::application::ports::upstream::{UpstreamClient, UpstreamToken};
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

pub struct HttpUpstreamClient {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl HttpUpstreamClient {
    /// `redirect_uri` is the bridge's own callback endpoint, registered with
    /// the upstream provider. `timeout` bounds the whole exchange round trip
    /// so a hung upstream cannot hold a callback request open indefinitely.
    pub fn new(
        upstream_base_url: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        timeout: Duration,
    ) -> BridgeResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| BridgeError::infrastructure(err.to_string()))?;

        Ok(Self {
            http,
            token_url: format!("{}/oauth/token", upstream_base_url.trim_end_matches('/')),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
        })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn exchange_code(&self, code: &str) -> BridgeResult<UpstreamToken> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|err| BridgeError::server_error(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "upstream token endpoint rejected the exchange");
            return Err(BridgeError::server_error(format!(
                "upstream token exchange returned {status}: {body}"
            )));
        }

        response
            .json::<UpstreamToken>()
            .await
            .map_err(|err| BridgeError::server_error(format!("malformed upstream response: {err}")))
    }
}
