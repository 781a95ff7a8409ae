//! Infrastructure Layer
//!
//! `reqwest`-backed HTTP client, interceptors and the shared cookie jar.

pub mod http;
pub mod interceptor;
pub mod session;
