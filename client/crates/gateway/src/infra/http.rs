//! API HTTP Client
//!
//! Thin wrapper around `reqwest` that runs the interceptor chain around
//! every request.
//!
//! ## Failure semantics
//! - Application failure (body `code` != success code): reported through the
//!   debounced notifier, the body is still returned as `Ok`.
//! - Transport failure (timeout, network, non-2xx status): reported through
//!   the notifier *and* returned as `Err`.

use std::sync::Arc;

use http::{HeaderMap, HeaderValue, header};
use platform::notify::Notifier;
use serde_json::Value;

use crate::application::config::ClientConfig;
use crate::domain::body::ApiBody;
use crate::error::{GatewayError, GatewayResult};
use crate::infra::interceptor::{
    ApiRequest, AppCodeCheck, RequestInterceptor, ResponseInterceptor, SanitizeParams,
};
use crate::infra::session::SessionJar;

/// Builder for [`HttpClient`] with a custom interceptor chain
pub struct HttpClientBuilder {
    config: ClientConfig,
    jar: Option<SessionJar>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl HttpClientBuilder {
    /// Share an existing cookie jar
    pub fn jar(mut self, jar: SessionJar) -> Self {
        self.jar = Some(jar);
        self
    }

    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn response_interceptor(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.response_interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn build(self) -> GatewayResult<HttpClient> {
        let jar = self
            .jar
            .unwrap_or_else(|| SessionJar::new(self.config.base_url.clone()));

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(self.config.timeout)
            .cookie_provider(jar.store())
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(HttpClient {
            client,
            config: Arc::new(self.config),
            jar,
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
        })
    }
}

/// API client with interceptors
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
    jar: SessionJar,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl HttpClient {
    /// Client with the standard chain: [`SanitizeParams`] on requests,
    /// [`AppCodeCheck`] on responses
    pub fn new(config: ClientConfig, notifier: Arc<dyn Notifier>) -> GatewayResult<Self> {
        let check = AppCodeCheck::with_notifier(notifier, config.error_debounce, config.success_code);
        Self::builder(config)
            .request_interceptor(SanitizeParams)
            .response_interceptor(check)
            .build()
    }

    /// Builder with an empty interceptor chain
    pub fn builder(config: ClientConfig) -> HttpClientBuilder {
        HttpClientBuilder {
            config,
            jar: None,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Cookie jar used for every request
    pub fn jar(&self) -> &SessionJar {
        &self.jar
    }

    pub async fn get(&self, path: &str, params: Value) -> GatewayResult<ApiBody> {
        self.send(ApiRequest::get(path).params(params)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> GatewayResult<ApiBody> {
        self.send(ApiRequest::post(path).body(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> GatewayResult<ApiBody> {
        self.send(ApiRequest::put(path).body(body)).await
    }

    pub async fn delete(&self, path: &str, params: Value) -> GatewayResult<ApiBody> {
        self.send(ApiRequest::delete(path).params(params)).await
    }

    /// Run a request through the interceptor chain
    pub async fn send(&self, mut request: ApiRequest) -> GatewayResult<ApiBody> {
        for interceptor in &self.request_interceptors {
            interceptor.on_request(&mut request)?;
        }

        match self.execute(&request).await {
            Ok(mut body) => {
                for interceptor in &self.response_interceptors {
                    body = interceptor.on_response(body)?;
                }
                Ok(body)
            }
            Err(err) => {
                err.log();
                for interceptor in &self.response_interceptors {
                    interceptor.on_error(&err);
                }
                Err(err)
            }
        }
    }

    async fn execute(&self, request: &ApiRequest) -> GatewayResult<ApiBody> {
        let url = self.config.endpoint(&request.path)?;
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());

        let query = request.query_pairs();
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(GatewayError::from_reqwest)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(GatewayError::from_reqwest)?;

        if !status.is_success() {
            return Err(GatewayError::status(status.as_u16()));
        }

        tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "Received response");
        Ok(ApiBody::from_bytes(&bytes))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .finish()
    }
}
