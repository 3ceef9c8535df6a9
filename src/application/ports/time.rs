// src/application/ports/time.rs
use chrono::{DateTime, Utc};

/// Injected time source. Expiry of pending authorizations, codes, and
/// sessions in the in-process store derives from this, so tests can drive
/// TTLs without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
