//! Conversion Tools
//!
//! Backing logic for the standalone tool pages: hex, base64, digests and
//! string helpers. Text input is treated as UTF-8.

use base64::{Engine, engine::general_purpose};
use kernel::error::app_error::AppError;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;

/// Codec result type alias
pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Decoded bytes are not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        AppError::bad_request(err.to_string()).with_source(err)
    }
}

// ============================================================================
// Hex
// ============================================================================

/// Lowercase hex of the UTF-8 bytes of `text`
pub fn hex_encode(text: &str) -> String {
    hex::encode(text.as_bytes())
}

/// Decode hex (either case, optional `0x` prefix, whitespace ignored) to text
pub fn hex_decode(input: &str) -> CodecResult<String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    let bytes = hex::decode(digits)?;
    Ok(String::from_utf8(bytes)?)
}

// ============================================================================
// Base64
// ============================================================================

/// Base64 alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Base64Variant {
    /// RFC 4648 standard alphabet with padding
    #[default]
    Standard,
    /// URL and filename safe alphabet without padding
    UrlSafe,
}

impl Base64Variant {
    fn engine(&self) -> general_purpose::GeneralPurpose {
        match self {
            Base64Variant::Standard => general_purpose::STANDARD,
            Base64Variant::UrlSafe => general_purpose::URL_SAFE_NO_PAD,
        }
    }
}

pub fn to_base64(text: &str, variant: Base64Variant) -> String {
    variant.engine().encode(text.as_bytes())
}

pub fn from_base64(input: &str, variant: Base64Variant) -> CodecResult<String> {
    let bytes = variant.engine().decode(input.trim())?;
    Ok(String::from_utf8(bytes)?)
}

// ============================================================================
// Digests
// ============================================================================

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 3] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(CodecError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Lowercase hex digest of the UTF-8 bytes of `text`
pub fn digest_hex(algorithm: HashAlgorithm, text: &str) -> String {
    let data = text.as_bytes();
    match algorithm {
        HashAlgorithm::Sha1 => hex::encode(Sha1::digest(data)),
        HashAlgorithm::Sha256 => hex::encode(sha256(data)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
    }
}

// ============================================================================
// String helpers
// ============================================================================

/// Counts shown by the string tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub chars: usize,
    pub bytes: usize,
    pub lines: usize,
    pub words: usize,
}

pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        chars: text.chars().count(),
        bytes: text.len(),
        lines: text.lines().count(),
        words: text.split_whitespace().count(),
    }
}

/// String transforms offered by the string tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTransform {
    Upper,
    Lower,
    Trim,
    Reverse,
}

impl TextTransform {
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextTransform::Upper => text.to_uppercase(),
            TextTransform::Lower => text.to_lowercase(),
            TextTransform::Trim => text.trim().to_string(),
            TextTransform::Reverse => text.chars().rev().collect(),
        }
    }
}
