// src/infrastructure/stores/mod.rs
pub mod memory;
pub mod redis;

pub use memory::MemoryAuthorizationStore;
pub use redis::RedisAuthorizationStore;
