//! Application Layer
//!
//! Client configuration and the auth gate.

pub mod check_auth;
pub mod config;

// Re-exports
pub use check_auth::{AuthGate, LOGIN_REQUIRED_MESSAGE};
pub use config::ClientConfig;
