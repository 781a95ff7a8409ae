//! Shared Kernel - Client-wide minimal core
//!
//! This crate holds the pieces every other crate leans on:
//! - Common error types and result aliases
//! - JSON payload sanitizing (`json`)
//! - Date/time rendering and timestamp conversion (`time`)
//!
//! Nothing in here performs I/O; everything is synchronous and pure.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod json;
pub mod time;

pub use error::app_error::{AppError, AppResult};
pub use error::kind::ErrorKind;
