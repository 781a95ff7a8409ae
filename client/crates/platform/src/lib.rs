//! Platform Crate - Client-side infrastructure
//!
//! Technical building blocks shared by the client crates:
//! - Cookie access (`cookie`)
//! - Persistent key-value storage (`storage`)
//! - User-visible notifications and debouncing (`notify`)
//! - Lazily loaded capabilities such as icons (`capability`)
//! - Conversion tools: hex, base64, digests, strings (`codec`)

pub mod capability;
pub mod codec;
pub mod cookie;
pub mod notify;
pub mod storage;
