// src/presentation/http/mod.rs
//! HTTP surface of the bridge: OAuth endpoints, discovery documents, and
//! bearer-token resolution for consumer-facing routes.
pub mod controllers;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
