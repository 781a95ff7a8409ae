//! Request and Response Interceptors
//!
//! Interceptors run in registration order: request interceptors before the
//! request is sent, response interceptors once it settles.

use std::sync::Arc;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use kernel::json::remove_empty_in_obj;
use platform::notify::{DebouncedNotifier, NoticeLevel, Notifier};
use serde_json::{Map, Value};

use crate::domain::body::ApiBody;
use crate::error::{GatewayError, GatewayResult};

/// Outgoing request, before it becomes an HTTP request
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, or an absolute URL
    pub path: String,
    /// Query parameters (a JSON object)
    pub params: Value,
    /// JSON body
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Value::Object(Map::new()),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Query pairs for the current params
    ///
    /// Strings are sent as-is, numbers and booleans as their JSON text,
    /// array items as repeated `key[]` entries, nested objects as JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Value::Object(map) = &self.params else {
            return Vec::new();
        };

        let mut pairs = Vec::with_capacity(map.len());
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    let array_key = format!("{key}[]");
                    pairs.extend(
                        items
                            .iter()
                            .filter(|item| !item.is_null())
                            .map(|item| (array_key.clone(), query_text(item))),
                    );
                }
                other => pairs.push((key.clone(), query_text(other))),
            }
        }
        pairs
    }
}

fn query_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Runs before a request is sent
pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: &mut ApiRequest) -> GatewayResult<()>;
}

/// Runs after a request settles
pub trait ResponseInterceptor: Send + Sync {
    /// Inspect or replace a received body
    fn on_response(&self, body: ApiBody) -> GatewayResult<ApiBody> {
        Ok(body)
    }

    /// Observe a transport failure; the failure is returned to the caller afterwards
    fn on_error(&self, _error: &GatewayError) {}
}

/// Strips empty values from the query params
#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizeParams;

impl RequestInterceptor for SanitizeParams {
    fn on_request(&self, request: &mut ApiRequest) -> GatewayResult<()> {
        request.params = remove_empty_in_obj(&request.params);
        Ok(())
    }
}

/// Reports failed requests through a debounced notifier
///
/// A body whose application code is not the success code produces an error
/// notice with the server's message; the body is still handed back to the
/// caller. Transport failures produce `server error: <CODE>`.
#[derive(Debug, Clone)]
pub struct AppCodeCheck {
    notifier: DebouncedNotifier,
    success_code: i64,
}

impl AppCodeCheck {
    pub fn new(notifier: DebouncedNotifier, success_code: i64) -> Self {
        Self {
            notifier,
            success_code,
        }
    }

    /// Build over a plain notifier with its own debounce window
    pub fn with_notifier(
        notifier: Arc<dyn Notifier>,
        window: std::time::Duration,
        success_code: i64,
    ) -> Self {
        Self::new(DebouncedNotifier::new(notifier, window), success_code)
    }

    pub fn notifier(&self) -> &DebouncedNotifier {
        &self.notifier
    }
}

impl ResponseInterceptor for AppCodeCheck {
    fn on_response(&self, body: ApiBody) -> GatewayResult<ApiBody> {
        if !body.is_success(self.success_code) {
            tracing::debug!(code = ?body.code, msg = ?body.msg, "Application error response");
            self.notifier
                .trigger(NoticeLevel::Error, body.error_message());
        }
        Ok(body)
    }

    fn on_error(&self, error: &GatewayError) {
        let code = error
            .transport_code()
            .map_or("UNKNOWN", |code| code.as_str());
        self.notifier
            .trigger(NoticeLevel::Error, format!("server error: {code}"));
    }
}
