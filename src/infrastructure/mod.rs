// src/infrastructure/mod.rs
pub mod stores;
pub mod time;
pub mod upstream;
