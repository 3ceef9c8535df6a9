//! OAuth 2.1 authorization bridge.
//!
//! Sits between a generic PKCE-capable client and an upstream OAuth
//! provider the client cannot talk to directly. The bridge issues its own
//! short-lived authorization artifacts, proxies the user agent through the
//! upstream flow, and mints opaque bearer tokens that resolve back to
//! upstream credentials.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
