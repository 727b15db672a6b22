//! # Error Taxonomy
//!
//! Every failure the codec can produce is a distinct [`StegoError`] variant, so a
//! front end can map each one to its own user-facing message instead of a
//! generic "encoding failed".

use thiserror::Error;

/// Errors produced while framing, embedding, extracting or loading carriers.
#[derive(Error, Debug)]
pub enum StegoError {
    /// The carrier cannot even hold the length header.
    #[error("carrier too small: the header needs {needed} bits but only {available} units are available")]
    InsufficientCarrier { needed: usize, available: usize },

    /// The frame declares (or needs) more bits than the carrier holds.
    #[error("truncated data: frame needs {needed} payload bits but only {remaining} remain in the carrier")]
    TruncatedData { needed: u64, remaining: usize },

    /// The payload does not fit; raised before the carrier is touched.
    #[error("payload too large: frame needs {needed} bits, carrier has {available} units")]
    CapacityExceeded { needed: u64, available: usize },

    /// Text auto-detection found no valid frame under any method.
    #[error("no hidden message found under any text encoding method")]
    UnknownEncoding,

    /// Carrier kind or container format is not recognised.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A text carrier file is not valid UTF-8.
    #[error("text carrier is not valid UTF-8")]
    InvalidText(#[from] std::string::FromUtf8Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StegoError>;
