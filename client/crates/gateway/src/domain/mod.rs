//! Domain Layer
//!
//! Routes, navigation and the API response body model.

pub mod body;
pub mod navigation;
pub mod route;

pub use body::ApiBody;
pub use navigation::{History, Navigator};
pub use route::{Route, ToolKind};
