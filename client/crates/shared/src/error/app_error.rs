//! Unified client error
//!
//! Every crate converts its own error enum into [`AppError`] at the point
//! where a failure is shown to the user or leaves the library.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Client error: a classification, a user-facing message, an optional
/// machine code and the underlying cause
///
/// The code carries whatever identifies the failure to the API side: a
/// transport code such as `ERR_NETWORK`, or the application code from a
/// response body.
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::RequestTimeout, "timeout exceeded")
///     .with_code("ECONNABORTED");
/// assert_eq!(err.to_string(), "request_timeout: timeout exceeded [ECONNABORTED]");
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    code: Option<Cow<'static, str>>,
    source: Option<BoxError>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Input the client itself cannot use (malformed JSON, unknown zone)
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    pub fn with_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Worth retrying unchanged: timeouts and an unreachable or failing API
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RequestTimeout | ErrorKind::BadGateway | ErrorKind::ServiceUnavailable
        )
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("code", &self.code)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        match &self.code {
            Some(code) => write!(f, " [{code}]"),
            None => Ok(()),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AppError::bad_request("Unknown time zone: Mars/Base");
        assert_eq!(err.to_string(), "bad_request: Unknown time zone: Mars/Base");
        assert_eq!(err.status_code(), 400);
        assert!(err.code().is_none());

        let err = AppError::new(ErrorKind::ServiceUnavailable, "Network Error").with_code("ERR_NETWORK");
        assert_eq!(err.to_string(), "service_unavailable: Network Error [ERR_NETWORK]");
    }

    #[test]
    fn test_source_is_exposed() {
        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "settings.json");
        let err = AppError::internal("Failed to read settings").with_source(cause);
        assert_eq!(err.source().unwrap().to_string(), "settings.json");
    }

    #[test]
    fn test_retryable() {
        assert!(AppError::new(ErrorKind::RequestTimeout, "slow").is_retryable());
        assert!(AppError::new(ErrorKind::BadGateway, "502").is_retryable());
        assert!(!AppError::bad_request("bad json").is_retryable());
        assert!(!AppError::new(ErrorKind::UnprocessableEntity, "title required").is_retryable());
    }
}
