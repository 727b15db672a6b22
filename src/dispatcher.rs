//! # Dispatcher
//!
//! Uniform encode/decode/capacity entry point over every carrier kind.
//!
//! The dispatcher resolves the concrete codec from the carrier's kind (and, for
//! text, the method), checks capacity *before* anything is written, and passes
//! codec errors through unchanged.
//!
//! ```ignore
//! let dispatcher = Dispatcher::new(StegoConfig::default())?;
//! let cover = CarrierData::Text(std::fs::read_to_string("cover.txt")?);
//!
//! let encoded = dispatcher.encode(&cover, b"secret", Some(TextMethod::ZeroWidth))?;
//! assert_eq!(dispatcher.decode(&encoded, None)?, b"secret");
//! ```

use log::debug;
use std::fmt;
use std::path::Path;

use crate::config::StegoConfig;
use crate::error::{Result, StegoError};
use crate::stego::capacity::{fits, CapacityReport};
use crate::stego::text::{TextCarrier, TextCodec};
use crate::stego::{conceal, reveal, AudioCarrier, Carrier, Framer, ImageCarrier, TextMethod};

/// Family of carrier, as declared by the caller or derived from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarrierKind {
    Image,
    Audio,
    Text,
}

impl CarrierKind {
    /// Resolve the kind from a file extension (without the dot, any case).
    ///
    /// # Errors
    /// `UnsupportedFormat` for anything other than png/jpg/jpeg/bmp, wav, txt or md.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "bmp" => Ok(Self::Image),
            "wav" => Ok(Self::Audio),
            "txt" | "md" => Ok(Self::Text),
            other => Err(StegoError::UnsupportedFormat(format!(
                "'.{other}' files are not supported (use png, jpg, jpeg, bmp, wav, txt or md)"
            ))),
        }
    }

    /// Resolve the kind from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                StegoError::UnsupportedFormat(format!("'{}' has no file extension", path.display()))
            })?;
        Self::from_extension(extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully decoded carrier handed over by the I/O layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarrierData {
    Image(ImageCarrier),
    Audio(AudioCarrier),
    Text(String),
}

impl CarrierData {
    pub fn kind(&self) -> CarrierKind {
        match self {
            Self::Image(_) => CarrierKind::Image,
            Self::Audio(_) => CarrierKind::Audio,
            Self::Text(_) => CarrierKind::Text,
        }
    }
}

/// Routes carriers to their codec.
///
/// Holds only configuration; every call works on caller-owned data and returns
/// new data, so one dispatcher can be shared freely.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: StegoConfig,
    framer: Framer,
    text: TextCodec,
}

impl Dispatcher {
    /// # Errors
    /// `InvalidConfig` when the configuration does not validate.
    pub fn new(config: StegoConfig) -> Result<Self> {
        config.validate()?;
        let framer = Framer::new(config.framing)?;
        let text = TextCodec::new(framer, config.text);

        Ok(Self {
            config,
            framer,
            text,
        })
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    fn text_method(&self, method: Option<TextMethod>) -> TextMethod {
        method.unwrap_or(self.config.text.default_method)
    }

    /// Capacity of `carrier`. For text, `method` selects which units are counted
    /// (default method when `None`); it is ignored for other kinds.
    pub fn capacity(&self, carrier: &CarrierData, method: Option<TextMethod>) -> CapacityReport {
        let kind = carrier.kind().as_str();
        match carrier {
            CarrierData::Image(image) => CapacityReport::measure(kind, None, image, &self.framer),
            CarrierData::Audio(audio) => CapacityReport::measure(kind, None, audio, &self.framer),
            CarrierData::Text(text) => {
                let method = self.text_method(method);
                let cover = self.text.cover(text, method);
                CapacityReport::measure(kind, Some(method), &cover, &self.framer)
            }
        }
    }

    /// Whether `payload` can be encoded into `carrier`. Never mutates the carrier.
    pub fn fits(&self, carrier: &CarrierData, payload: &[u8], method: Option<TextMethod>) -> bool {
        match carrier {
            CarrierData::Image(image) => fits(image, &self.framer, payload.len()),
            CarrierData::Audio(audio) => fits(audio, &self.framer, payload.len()),
            CarrierData::Text(text) => {
                let cover = self.text.cover(text, self.text_method(method));
                fits(&cover, &self.framer, payload.len())
            }
        }
    }

    /// Hide `payload` in a copy of `carrier`.
    ///
    /// # Errors
    /// `CapacityExceeded` when the frame does not fit; the carrier is untouched.
    pub fn encode(
        &self,
        carrier: &CarrierData,
        payload: &[u8],
        method: Option<TextMethod>,
    ) -> Result<CarrierData> {
        debug!(
            "Encoding {} payload bytes into {} carrier",
            payload.len(),
            carrier.kind()
        );

        match carrier {
            CarrierData::Image(image) => {
                self.ensure_fits(image, payload)?;
                Ok(CarrierData::Image(conceal(image, &self.framer, payload)?))
            }
            CarrierData::Audio(audio) => {
                self.ensure_fits(audio, payload)?;
                Ok(CarrierData::Audio(conceal(audio, &self.framer, payload)?))
            }
            CarrierData::Text(text) => {
                let cover = self.text.cover(text, self.text_method(method));
                self.ensure_fits(&cover, payload)?;
                let encoded: TextCarrier = conceal(&cover, &self.framer, payload)?;
                debug!("Text encoded with the {} method", encoded.method());
                Ok(CarrierData::Text(encoded.render()))
            }
        }
    }

    /// Recover the payload hidden in `carrier`.
    ///
    /// For text, `None` auto-detects the method.
    pub fn decode(&self, carrier: &CarrierData, method: Option<TextMethod>) -> Result<Vec<u8>> {
        let payload = match carrier {
            CarrierData::Image(image) => reveal(image, &self.framer)?,
            CarrierData::Audio(audio) => reveal(audio, &self.framer)?,
            CarrierData::Text(text) => self.text.decode(text, method)?,
        };

        debug!(
            "Decoded {} payload bytes from {} carrier",
            payload.len(),
            carrier.kind()
        );
        Ok(payload)
    }

    fn ensure_fits<C: Carrier + ?Sized>(&self, carrier: &C, payload: &[u8]) -> Result<()> {
        if fits(carrier, &self.framer, payload.len()) {
            return Ok(());
        }

        let needed = self.framer.frame_bits(payload.len());
        debug!(
            "Capacity check failed: frame needs {} bits, carrier has {} units",
            needed,
            carrier.unit_count()
        );
        Err(StegoError::CapacityExceeded {
            needed,
            available: carrier.unit_count(),
        })
    }
}
