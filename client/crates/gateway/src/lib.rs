//! Gateway - API access for the blog client
//!
//! Layered like the other client crates:
//! - `domain/` - routes, navigation, response body model
//! - `application/` - configuration and the auth gate
//! - `infra/` - HTTP client, interceptors, cookie jar
//!
//! ## Request flow
//! 1. Request interceptors run in registration order (query params are
//!    stripped of empty values)
//! 2. The request is sent with credentials and a fixed timeout
//! 3. Response interceptors run in registration order (non-success
//!    application codes raise a debounced error notice)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::{AuthGate, ClientConfig};
pub use domain::{ApiBody, History, Navigator, Route, ToolKind};
pub use error::{GatewayError, GatewayResult, TransportCode};
pub use infra::http::{HttpClient, HttpClientBuilder};
pub use infra::interceptor::{
    ApiRequest, AppCodeCheck, RequestInterceptor, ResponseInterceptor, SanitizeParams,
};
pub use infra::session::SessionJar;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
