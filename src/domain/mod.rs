// src/domain/mod.rs
pub mod pkce;
