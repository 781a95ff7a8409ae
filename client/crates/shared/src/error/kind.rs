//! Error classification
//!
//! Kinds borrow HTTP status semantics so that an upstream status maps onto
//! a kind without a translation table per caller.

use std::fmt;

/// What went wrong, coarsely
///
/// 4xx kinds: the request (or local input) was at fault.
/// 5xx kinds: the API, or the way to it, was at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    BadRequest,
    /// No session cookie, or the API rejected it
    Unauthorized,
    Forbidden,
    NotFound,
    /// Timeout elapsed before the response arrived
    RequestTimeout,
    /// Well-formed request refused by the API's own rules
    UnprocessableEntity,
    InternalServerError,
    /// The API answered with something unusable
    BadGateway,
    /// The API could not be reached
    ServiceUnavailable,
}

impl ErrorKind {
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::RequestTimeout => 408,
            ErrorKind::UnprocessableEntity => 422,
            ErrorKind::InternalServerError => 500,
            ErrorKind::BadGateway => 502,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Snake-case name used in logs and `Display`
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::RequestTimeout => "request_timeout",
            ErrorKind::UnprocessableEntity => "unprocessable_entity",
            ErrorKind::InternalServerError => "internal",
            ErrorKind::BadGateway => "bad_gateway",
            ErrorKind::ServiceUnavailable => "service_unavailable",
        }
    }

    /// Kind for an HTTP status received from the API
    ///
    /// Statuses without a dedicated kind fall back to `BadRequest` (4xx)
    /// or `BadGateway` (everything else).
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::RequestTimeout,
            422 => ErrorKind::UnprocessableEntity,
            500 => ErrorKind::InternalServerError,
            503 => ErrorKind::ServiceUnavailable,
            400..=499 => ErrorKind::BadRequest,
            _ => ErrorKind::BadGateway,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
