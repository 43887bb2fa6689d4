//! Error types for the watch face core.
//!
//! None of these are fatal to the face: every failure degrades to "keep
//! showing the last known good state". All variants are `Copy` so they can
//! be logged and passed across the worker boundary without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Icon ingestion errors
// ---------------------------------------------------------------------------

/// Failures while turning an icon asset reference into a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestError {
    /// The asset reference was empty or missing.
    InvalidAsset,
    /// The sync channel could not be established within the bound.
    ChannelTimeout,
    /// The asset stream could not be opened.
    AssetUnavailable,
    /// The asset bytes are not a decodable image.
    Decode,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAsset => write!(f, "invalid asset reference"),
            Self::ChannelTimeout => write!(f, "sync channel timed out"),
            Self::AssetUnavailable => write!(f, "asset stream unavailable"),
            Self::Decode => write!(f, "icon decode failed"),
        }
    }
}

impl std::error::Error for IngestError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading a [`FaceConfig`](crate::config::FaceConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for the config schema.
    Parse,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config parse error"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Data-sync payload errors
// ---------------------------------------------------------------------------

/// Errors from encoding or decoding a data-sync item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// The item could not be serialized.
    Encode,
    /// The bytes are not a valid data item.
    Malformed,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode => write!(f, "data item encode failed"),
            Self::Malformed => write!(f, "malformed data item"),
        }
    }
}

impl std::error::Error for PayloadError {}

// ---------------------------------------------------------------------------
// Unified error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate converts into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Ingest(IngestError),
    Config(ConfigError),
    Payload(PayloadError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingest(e) => write!(f, "ingest: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Payload(e) => write!(f, "payload: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<IngestError> for Error {
    fn from(e: IngestError) -> Self {
        Self::Ingest(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PayloadError> for Error {
    fn from(e: PayloadError) -> Self {
        Self::Payload(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
