//! Gateway Error Types
//!
//! Gateway-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use std::fmt;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Gateway result type alias
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Transport failure codes, as shown to users (`server error: ERR_NETWORK`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCode {
    /// The request exceeded the configured timeout
    Timeout,
    /// No response was received (DNS, refused connection, reset, ...)
    Network,
    /// The server answered with a 4xx status
    BadRequest,
    /// The server answered with a 5xx status or an unreadable body
    BadResponse,
}

impl TransportCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransportCode::Timeout => "ECONNABORTED",
            TransportCode::Network => "ERR_NETWORK",
            TransportCode::BadRequest => "ERR_BAD_REQUEST",
            TransportCode::BadResponse => "ERR_BAD_RESPONSE",
        }
    }

    /// Code for a non-2xx HTTP status
    pub const fn for_status(status: u16) -> Self {
        if status >= 400 && status < 500 {
            TransportCode::BadRequest
        } else {
            TransportCode::BadResponse
        }
    }
}

impl fmt::Display for TransportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gateway error variants
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a usable HTTP response
    #[error("{message}")]
    Transport {
        code: TransportCode,
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The API answered with a non-success application code
    #[error("Application error {}: {message}", code.map_or_else(|| "(none)".to_string(), |c| c.to_string()))]
    Application { code: Option<i64>, message: String },

    /// Endpoint could not be built from base URL and path
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response data did not match the expected shape
    #[error("Unexpected response data: {0}")]
    Decode(#[source] serde_json::Error),

    /// Configuration error
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn transport(code: TransportCode, message: impl Into<String>) -> Self {
        GatewayError::Transport {
            code,
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Non-2xx HTTP status
    pub fn status(status: u16) -> Self {
        GatewayError::Transport {
            code: TransportCode::for_status(status),
            status: Some(status),
            message: format!("Request failed with status code {status}"),
            source: None,
        }
    }

    /// Classify a reqwest failure
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let code = if err.is_timeout() {
            TransportCode::Timeout
        } else if let Some(status) = status {
            TransportCode::for_status(status)
        } else if err.is_decode() {
            TransportCode::BadResponse
        } else {
            TransportCode::Network
        };
        let message = match code {
            TransportCode::Timeout => "timeout exceeded".to_string(),
            TransportCode::Network => "Network Error".to_string(),
            _ => err.to_string(),
        };

        GatewayError::Transport {
            code,
            status,
            message,
            source: Some(err),
        }
    }

    /// Transport code, for transport failures only
    pub fn transport_code(&self) -> Option<TransportCode> {
        match self {
            GatewayError::Transport { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Transport { code, status, .. } => match (code, status) {
                (TransportCode::Timeout, _) => ErrorKind::RequestTimeout,
                (TransportCode::Network, _) => ErrorKind::ServiceUnavailable,
                (_, Some(status)) => ErrorKind::from_status(*status),
                (_, None) => ErrorKind::BadGateway,
            },
            GatewayError::Application { .. } => ErrorKind::UnprocessableEntity,
            GatewayError::InvalidUrl(_) | GatewayError::Config(_) => ErrorKind::BadRequest,
            GatewayError::Decode(_) => ErrorKind::BadGateway,
            GatewayError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            GatewayError::Transport { code, .. } => err.with_code(code.as_str()),
            GatewayError::Application {
                code: Some(code), ..
            } => err.with_code(code.to_string()),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            GatewayError::Transport {
                code,
                status,
                source,
                ..
            } => {
                tracing::warn!(
                    code = %code,
                    status = ?status,
                    error = ?source.as_ref().map(|e| e.to_string()),
                    "Request failed in transport"
                );
            }
            GatewayError::Internal(msg) => {
                tracing::error!(message = %msg, "Gateway internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Gateway error");
            }
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        err.to_app_error()
    }
}

impl From<AppError> for GatewayError {
    fn from(err: AppError) -> Self {
        GatewayError::Internal(err.to_string())
    }
}
