// tests/support/mocks.rs
use authbridge::application::error::{BridgeError, BridgeResult};
use authbridge::application::ports::time::Clock;
use authbridge::application::ports::upstream::{UpstreamClient, UpstreamToken};
use chrono::{DateTime, Utc};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

/// Test clock whose time only moves when a test advances it.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc::now()),
        })
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap();
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Upstream provider stub: records exchanged codes and can be told to fail
/// the next exchange.
pub struct MockUpstreamClient {
    access_token: String,
    fail_next: AtomicBool,
    seen_codes: Mutex<Vec<String>>,
}

impl MockUpstreamClient {
    pub fn new(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            fail_next: AtomicBool::new(false),
            seen_codes: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_next_exchange(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn seen_codes(&self) -> Vec<String> {
        self.seen_codes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn exchange_code(&self, code: &str) -> BridgeResult<UpstreamToken> {
        self.seen_codes.lock().unwrap().push(code.to_string());
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(BridgeError::server_error("simulated upstream outage"));
        }
        Ok(UpstreamToken {
            access_token: self.access_token.clone(),
            token_type: "Bearer".into(),
            scope: Some("login".into()),
        })
    }
}
