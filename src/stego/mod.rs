//! # LSB Steganography Core
//!
//! Every carrier (image, audio, text) is reduced to the same capability set: an
//! ordered list of *embeddable units*, each able to store exactly one bit. The
//! framer and the generic [`conceal`] / [`reveal`] drivers only ever talk to that
//! capability set, so format-specific code is limited to deciding *which* units
//! exist and in which order.
//!
//! ## Encoding
//! 1. [`Framer::pack`] turns the payload into `[length header][payload bits]`
//! 2. The carrier is cloned; the caller's instance is never touched
//! 3. Frame bit `i` is written into unit `i` of the clone
//!
//! ## Decoding
//! 1. Units are read in the same order through a [`BitReader`]
//! 2. [`Framer::unpack`] reads the header, then exactly as many payload bits as it declares
//!
//! ## Modules
//!
//! - [`framer`]: Bit/byte framing with a length header
//! - [`capacity`]: Capacity queries and reports
//! - [`image`]: Pixel channel carrier
//! - [`audio`]: PCM sample carrier
//! - [`text`]: Whitespace and zero-width carriers, with method auto-detection

pub mod audio;
pub mod capacity;
pub mod framer;
pub mod image;
pub mod text;

pub use audio::{AudioCarrier, PcmSamples};
pub use capacity::{capacity_bits, fits, CapacityReport};
pub use framer::{BitReader, Framer};
pub use image::ImageCarrier;
pub use text::{TextMethod, WhitespaceText, ZeroWidthText};

use crate::error::{Result, StegoError};

/// A medium made of embeddable units, each holding one bit.
///
/// Units are addressed by their position in the carrier's fixed iteration order.
pub trait Carrier {
    /// Number of units that can be written.
    fn unit_count(&self) -> usize;

    /// Number of leading units that currently carry a readable bit.
    ///
    /// Equal to [`unit_count`](Carrier::unit_count) for carriers where every unit
    /// always has a value (pixel channels, samples, whitespace gaps).
    fn readable_units(&self) -> usize {
        self.unit_count()
    }

    /// Bit stored in unit `index`. `index` must be below `readable_units()`.
    fn read_unit(&self, index: usize) -> bool;

    /// Store `bit` in unit `index`. `index` must be below `unit_count()`.
    fn write_unit(&mut self, index: usize, bit: bool);
}

/// Hide `payload` in a copy of `carrier`.
///
/// # Returns
/// - `Ok(C)`: A new carrier whose first units hold the framed payload; the
///   remaining units are left as they were
/// - `Err(InsufficientCarrier)`: The carrier cannot hold the header
/// - `Err(TruncatedData)`: Header fits but the payload bits do not
///
/// Both checks run before the copy is made, so a failure never yields a
/// half-written carrier.
pub fn conceal<C>(carrier: &C, framer: &Framer, payload: &[u8]) -> Result<C>
where
    C: Carrier + Clone,
{
    let units = carrier.unit_count();
    let header_bits = framer.header_bits();

    if units < header_bits {
        return Err(StegoError::InsufficientCarrier {
            needed: header_bits,
            available: units,
        });
    }

    let bits = framer.pack(payload)?;
    if bits.len() > units {
        return Err(StegoError::TruncatedData {
            needed: (bits.len() - header_bits) as u64,
            remaining: units - header_bits,
        });
    }

    let mut output = carrier.clone();
    for (index, bit) in bits.iter().enumerate() {
        output.write_unit(index, *bit);
    }

    Ok(output)
}

/// Recover the payload hidden in `carrier`.
pub fn reveal<C>(carrier: &C, framer: &Framer) -> Result<Vec<u8>>
where
    C: Carrier + ?Sized,
{
    framer.unpack(&mut BitReader::new(carrier))
}
