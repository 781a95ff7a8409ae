//! `From` conversions into [`AppError`]

use super::app_error::AppError;

/// Unreadable JSON input is the caller's problem; failing to produce JSON is ours
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() || err.is_data() {
            AppError::bad_request(format!("Invalid JSON: {err}")).with_source(err)
        } else {
            AppError::internal("Failed to encode JSON").with_source(err)
        }
    }
}
