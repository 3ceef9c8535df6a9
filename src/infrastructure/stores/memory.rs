// src/infrastructure/stores/memory.rs
//! Process-local authorization store.
//!
//! Guarded maps with expiry checked lazily on every read and reclaimed by a
//! periodic sweep. Correct only when a single process instance handles all
//! requests for a given flow; multi-instance deployments need the Redis
//! backend instead.

use crate::application::BridgeResult;
use crate::application::error::BridgeError;
use crate::application::ports::authorization::{
    AuthorizationCode, AuthorizationStore, PendingAuthorization, Session,
};
use crate::application::ports::time::Clock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Entry<T> {
    record: T,
    expires_at: DateTime<Utc>,
}

pub struct MemoryAuthorizationStore {
    clock: Arc<dyn Clock>,
    pending: Mutex<HashMap<String, Entry<PendingAuthorization>>>,
    codes: Mutex<HashMap<String, Entry<AuthorizationCode>>>,
    sessions: Mutex<HashMap<String, Entry<Session>>>,
}

impl MemoryAuthorizationStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            pending: Mutex::new(HashMap::new()),
            codes: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every entry past its expiry. Runs under the same locks as
    /// `take_*`, so sweeping an already-consumed key is simply a no-op.
    pub fn sweep_expired(&self) {
        let now = self.clock.now();
        let mut removed = 0usize;
        removed += sweep_map(&self.pending, now);
        removed += sweep_map(&self.codes, now);
        removed += sweep_map(&self.sessions, now);
        if removed > 0 {
            tracing::debug!(removed, "swept expired authorization records");
        }
    }

    /// Reclaim memory from abandoned flows in the background. The sweep is
    /// belt-and-suspenders on top of lazy expiry-on-read.
    pub fn spawn_sweeper(store: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                store.sweep_expired();
            }
        })
    }

    fn expiry(&self, ttl: Duration) -> BridgeResult<DateTime<Utc>> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|err| BridgeError::infrastructure(format!("ttl out of range: {err}")))?;
        Ok(self.clock.now() + ttl)
    }
}

fn sweep_map<T>(map: &Mutex<HashMap<String, Entry<T>>>, now: DateTime<Utc>) -> usize {
    let mut guard = map.lock().unwrap();
    let before = guard.len();
    guard.retain(|_, entry| entry.expires_at > now);
    before - guard.len()
}

fn put_entry<T>(
    map: &Mutex<HashMap<String, Entry<T>>>,
    key: String,
    record: T,
    expires_at: DateTime<Utc>,
) {
    let mut guard = map.lock().unwrap();
    guard.insert(key, Entry { record, expires_at });
}

fn get_live<T: Clone>(
    map: &Mutex<HashMap<String, Entry<T>>>,
    key: &str,
    now: DateTime<Utc>,
) -> Option<T> {
    let mut guard = map.lock().unwrap();
    match guard.get(key) {
        Some(entry) if entry.expires_at > now => Some(entry.record.clone()),
        Some(_) => {
            guard.remove(key);
            None
        }
        None => None,
    }
}

fn take_live<T>(
    map: &Mutex<HashMap<String, Entry<T>>>,
    key: &str,
    now: DateTime<Utc>,
) -> Option<T> {
    let mut guard = map.lock().unwrap();
    let entry = guard.remove(key)?;
    if entry.expires_at > now {
        Some(entry.record)
    } else {
        None
    }
}

fn delete_entry<T>(map: &Mutex<HashMap<String, Entry<T>>>, key: &str) {
    let mut guard = map.lock().unwrap();
    guard.remove(key);
}

#[async_trait]
impl AuthorizationStore for MemoryAuthorizationStore {
    async fn put_pending(
        &self,
        record: PendingAuthorization,
        ttl: Duration,
    ) -> BridgeResult<()> {
        let expires_at = self.expiry(ttl)?;
        put_entry(
            &self.pending,
            record.upstream_state.clone(),
            record,
            expires_at,
        );
        Ok(())
    }

    async fn get_pending(
        &self,
        upstream_state: &str,
    ) -> BridgeResult<Option<PendingAuthorization>> {
        Ok(get_live(&self.pending, upstream_state, self.clock.now()))
    }

    async fn take_pending(
        &self,
        upstream_state: &str,
    ) -> BridgeResult<Option<PendingAuthorization>> {
        Ok(take_live(&self.pending, upstream_state, self.clock.now()))
    }

    async fn delete_pending(&self, upstream_state: &str) -> BridgeResult<()> {
        delete_entry(&self.pending, upstream_state);
        Ok(())
    }

    async fn put_code(&self, record: AuthorizationCode, ttl: Duration) -> BridgeResult<()> {
        let expires_at = self.expiry(ttl)?;
        put_entry(&self.codes, record.code.clone(), record, expires_at);
        Ok(())
    }

    async fn get_code(&self, code: &str) -> BridgeResult<Option<AuthorizationCode>> {
        Ok(get_live(&self.codes, code, self.clock.now()))
    }

    async fn take_code(&self, code: &str) -> BridgeResult<Option<AuthorizationCode>> {
        Ok(take_live(&self.codes, code, self.clock.now()))
    }

    async fn delete_code(&self, code: &str) -> BridgeResult<()> {
        delete_entry(&self.codes, code);
        Ok(())
    }

    async fn put_session(&self, record: Session, ttl: Duration) -> BridgeResult<()> {
        let expires_at = self.expiry(ttl)?;
        put_entry(&self.sessions, record.token.clone(), record, expires_at);
        Ok(())
    }

    async fn get_session(&self, token: &str) -> BridgeResult<Option<Session>> {
        Ok(get_live(&self.sessions, token, self.clock.now()))
    }

    async fn delete_session(&self, token: &str) -> BridgeResult<()> {
        delete_entry(&self.sessions, token);
        Ok(())
    }
}
