// src/application/ports/mod.rs
pub mod authorization;
pub mod time;
pub mod upstream;

// Aliases for the trait objects handed to services at wiring time.
pub type AuthorizationStorePort = dyn authorization::AuthorizationStore;
pub type UpstreamClientPort = dyn upstream::UpstreamClient;
pub type ClockPort = dyn time::Clock;
