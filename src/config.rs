//! # Configuration
//!
//! Tunables that would otherwise be module-wide constants (header width, channel
//! usage, zero-width marks) are carried in [`StegoConfig`] and handed to each
//! codec at construction time.
//!
//! ## TOML layout
//!
//! ```toml
//! [framing]
//! header_bits = 32
//!
//! [image]
//! include_alpha = false
//!
//! [text]
//! default_method = "whitespace"
//! zero_mark = "\u200B"
//! one_mark = "\u200C"
//! ```
//!
//! Every section and field is optional; missing values take their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, StegoError};
use crate::stego::text::TextMethod;

/// Default width of the length header, in bits.
pub const DEFAULT_HEADER_BITS: u32 = 32;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("stegano.toml")?;
/// ```
pub fn load_config<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| StegoError::InvalidConfig(e.to_string()))
}

/// Complete codec configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub framing: FramingConfig,
    pub image: ImageConfig,
    pub text: TextConfig,
}

impl StegoConfig {
    /// Read and validate a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: StegoConfig = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the codecs cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.framing.validate()?;
        self.text.validate()
    }
}

/// Length-header framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Width of the big-endian payload length header (1..=64).
    pub header_bits: u32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            header_bits: DEFAULT_HEADER_BITS,
        }
    }
}

impl FramingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=64).contains(&self.header_bits) {
            return Err(StegoError::InvalidConfig(format!(
                "header_bits must be between 1 and 64, got {}",
                self.header_bits
            )));
        }
        Ok(())
    }
}

/// Raster channel selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Embed into the alpha channel too, when the image has one.
    pub include_alpha: bool,
}

/// Text method selection and zero-width mark choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Method used for encoding when the caller does not name one.
    pub default_method: TextMethod,
    /// Mark standing for a 0 bit.
    pub zero_mark: char,
    /// Mark standing for a 1 bit.
    pub one_mark: char,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_method: TextMethod::Whitespace,
            zero_mark: '\u{200B}',
            one_mark: '\u{200C}',
        }
    }
}

impl TextConfig {
    pub fn validate(&self) -> Result<()> {
        if self.zero_mark == self.one_mark {
            return Err(StegoError::InvalidConfig(
                "zero_mark and one_mark must differ".to_string(),
            ));
        }
        // marks are stripped from the cover, so they must never be visible text
        for mark in [self.zero_mark, self.one_mark] {
            if mark.is_whitespace()
                || mark.is_control()
                || mark.is_alphanumeric()
                || mark.is_ascii_graphic()
            {
                return Err(StegoError::InvalidConfig(format!(
                    "U+{:04X} cannot be a zero-width mark: it is visible, whitespace or a control character",
                    mark as u32
                )));
            }
        }
        Ok(())
    }
}
