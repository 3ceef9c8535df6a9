// src/infrastructure/stores/redis.rs
//! Redis-backed authorization store for horizontally scaled deployments.
//!
//! TTLs are delegated to Redis (`SET ... EX`), so no local sweep exists.
//! Single-use consumption maps onto `GETDEL`, which is atomic server-side:
//! two instances racing on the same key cannot both observe the record.
//! Keys carry a deployment namespace so environments sharing one Redis
//! instance never collide.

use crate::application::BridgeResult;
use crate::application::error::BridgeError;
use crate::application::ports::authorization::{
    AuthorizationCode, AuthorizationStore, PendingAuthorization, Session,
};
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Pool, Runtime};
use redis::AsyncCommands;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct RedisAuthorizationStore {
    pool: Pool,
    namespace: String,
}

impl RedisAuthorizationStore {
    /// Create a Redis-backed store from a redis URL
    /// (e.g. `redis://:password@host:6379/0`).
    pub fn from_url(url: &str, namespace: &str) -> Result<Self, BridgeError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| BridgeError::service_unavailable(err.to_string()))?;

        Ok(Self {
            pool,
            namespace: namespace.to_string(),
        })
    }

    fn key(&self, kind: &str, key: &str) -> String {
        format!("{}:{}:{}", self.namespace, kind, key)
    }

    async fn conn(&self) -> BridgeResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| BridgeError::service_unavailable(err.to_string()))
    }

    async fn put_json<T: Serialize + Sync>(
        &self,
        key: String,
        record: &T,
        ttl: Duration,
    ) -> BridgeResult<()> {
        let payload = serde_json::to_string(record)
            .map_err(|err| BridgeError::infrastructure(err.to_string()))?;
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, payload, ttl.as_secs())
            .await
            .map_err(|err| BridgeError::service_unavailable(err.to_string()))?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, key: String) -> BridgeResult<Option<T>> {
        let mut conn = self.conn().await?;
        let payload: Option<String> = conn
            .get(key)
            .await
            .map_err(|err| BridgeError::service_unavailable(err.to_string()))?;
        decode(payload)
    }

    /// GETDEL: fetch and remove in one server-side step.
    async fn take_json<T: DeserializeOwned>(&self, key: String) -> BridgeResult<Option<T>> {
        let mut conn = self.conn().await?;
        let payload: Option<String> = redis::cmd("GETDEL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|err| BridgeError::service_unavailable(err.to_string()))?;
        decode(payload)
    }

    async fn del(&self, key: String) -> BridgeResult<()> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|err| BridgeError::service_unavailable(err.to_string()))?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(payload: Option<String>) -> BridgeResult<Option<T>> {
    match payload {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| BridgeError::infrastructure(format!("corrupt store record: {err}"))),
        None => Ok(None),
    }
}

#[async_trait]
impl AuthorizationStore for RedisAuthorizationStore {
    async fn put_pending(
        &self,
        record: PendingAuthorization,
        ttl: Duration,
    ) -> BridgeResult<()> {
        self.put_json(self.key("pending", &record.upstream_state), &record, ttl)
            .await
    }

    async fn get_pending(
        &self,
        upstream_state: &str,
    ) -> BridgeResult<Option<PendingAuthorization>> {
        self.get_json(self.key("pending", upstream_state)).await
    }

    async fn take_pending(
        &self,
        upstream_state: &str,
    ) -> BridgeResult<Option<PendingAuthorization>> {
        self.take_json(self.key("pending", upstream_state)).await
    }

    async fn delete_pending(&self, upstream_state: &str) -> BridgeResult<()> {
        self.del(self.key("pending", upstream_state)).await
    }

    async fn put_code(&self, record: AuthorizationCode, ttl: Duration) -> BridgeResult<()> {
        self.put_json(self.key("code", &record.code), &record, ttl)
            .await
    }

    async fn get_code(&self, code: &str) -> BridgeResult<Option<AuthorizationCode>> {
        self.get_json(self.key("code", code)).await
    }

    async fn take_code(&self, code: &str) -> BridgeResult<Option<AuthorizationCode>> {
        self.take_json(self.key("code", code)).await
    }

    async fn delete_code(&self, code: &str) -> BridgeResult<()> {
        self.del(self.key("code", code)).await
    }

    async fn put_session(&self, record: Session, ttl: Duration) -> BridgeResult<()> {
        self.put_json(self.key("session", &record.token), &record, ttl)
            .await
    }

    async fn get_session(&self, token: &str) -> BridgeResult<Option<Session>> {
        self.get_json(self.key("session", token)).await
    }

    async fn delete_session(&self, token: &str) -> BridgeResult<()> {
        self.del(self.key("session", token)).await
    }
}
