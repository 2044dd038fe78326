//! Unified error types for odfgen.
//!
//! Event calls on the generators never fail: structural misuse is logged and
//! skipped. This type covers the fallible edges around them, such as writing a
//! zip package, importing XML fragments or decoding binary payloads.
use thiserror::Error;

/// Main error type for odfgen operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Malformed input value (cell address, base64 payload, ...)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Operation requested in a state that cannot honour it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Feature disabled at compile time
    #[error("Feature '{0}' is disabled. Enable it with --features {0}")]
    FeatureDisabled(String),
}

/// Result type for odfgen operations.
pub type Result<T> = std::result::Result<T, Error>;
