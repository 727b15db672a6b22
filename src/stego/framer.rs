//! # Bit/Byte Framer
//!
//! Converts a byte payload into a self-delimiting bitstream and back.
//!
//! ## Frame layout
//! ```text
//! [header_bits: payload length in bytes, MSB first] [payload bytes, each MSB first]
//! ```
//!
//! With the default 32-bit header, a 2-byte payload occupies 32 + 16 = 48 units.
//! A zero-length payload is a valid frame made of the header alone.

use crate::config::FramingConfig;
use crate::error::{Result, StegoError};

use super::Carrier;

/// Sequential reader over a carrier's readable units.
pub struct BitReader<'a, C: ?Sized> {
    carrier: &'a C,
    position: usize,
}

impl<'a, C: Carrier + ?Sized> BitReader<'a, C> {
    pub fn new(carrier: &'a C) -> Self {
        Self {
            carrier,
            position: 0,
        }
    }

    /// Units not yet consumed.
    pub fn remaining(&self) -> usize {
        self.carrier.readable_units().saturating_sub(self.position)
    }
}

impl<C: Carrier + ?Sized> Iterator for BitReader<'_, C> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.remaining() == 0 {
            return None;
        }
        let bit = self.carrier.read_unit(self.position);
        self.position += 1;
        Some(bit)
    }
}

/// Length-header framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framer {
    header_bits: u32,
}

impl Default for Framer {
    fn default() -> Self {
        Self {
            header_bits: FramingConfig::default().header_bits,
        }
    }
}

impl Framer {
    /// Create a framer from validated configuration.
    ///
    /// # Errors
    /// `InvalidConfig` when the header width is outside 1..=64.
    pub fn new(config: FramingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            header_bits: config.header_bits,
        })
    }

    /// Width of the length header in bits.
    pub fn header_bits(&self) -> usize {
        self.header_bits as usize
    }

    /// Largest payload length (in bytes) the header can express.
    pub fn max_payload_len(&self) -> u64 {
        if self.header_bits >= 64 {
            u64::MAX
        } else {
            (1u64 << self.header_bits) - 1
        }
    }

    /// Total frame size in bits for a payload of `payload_len` bytes.
    pub fn frame_bits(&self, payload_len: usize) -> u64 {
        (payload_len as u64)
            .saturating_mul(8)
            .saturating_add(self.header_bits as u64)
    }

    /// Expand `payload` into `[header][payload]` bits.
    ///
    /// # Errors
    /// `CapacityExceeded` when the payload length cannot be written in the header.
    pub fn pack(&self, payload: &[u8]) -> Result<Vec<bool>> {
        let len = payload.len() as u64;
        if len > self.max_payload_len() {
            return Err(StegoError::CapacityExceeded {
                needed: self.frame_bits(payload.len()),
                available: self
                    .max_payload_len()
                    .saturating_mul(8)
                    .saturating_add(self.header_bits as u64)
                    .try_into()
                    .unwrap_or(usize::MAX),
            });
        }

        let mut bits = Vec::with_capacity(self.header_bits() + payload.len() * 8);
        for shift in (0..self.header_bits).rev() {
            bits.push((len >> shift) & 1 == 1);
        }
        for byte in payload {
            for shift in (0..8).rev() {
                bits.push((byte >> shift) & 1 == 1);
            }
        }

        Ok(bits)
    }

    /// Read one frame from `reader` and return its payload.
    ///
    /// # Errors
    /// - `InsufficientCarrier`: fewer readable units than the header needs
    /// - `TruncatedData`: the header declares more payload bits than remain
    pub fn unpack<C>(&self, reader: &mut BitReader<'_, C>) -> Result<Vec<u8>>
    where
        C: Carrier + ?Sized,
    {
        let header_bits = self.header_bits();
        if reader.remaining() < header_bits {
            return Err(StegoError::InsufficientCarrier {
                needed: header_bits,
                available: reader.remaining(),
            });
        }

        let mut len = 0u64;
        for bit in reader.by_ref().take(header_bits) {
            len = (len << 1) | u64::from(bit);
        }

        let remaining = reader.remaining();
        let needed = len.saturating_mul(8);
        if needed > remaining as u64 {
            return Err(StegoError::TruncatedData { needed, remaining });
        }

        // bounded by `remaining`, so it fits in usize
        let len = len as usize;
        let mut payload = Vec::with_capacity(len);
        for _ in 0..len {
            let mut byte = 0u8;
            for bit in reader.by_ref().take(8) {
                byte = (byte << 1) | u8::from(bit);
            }
            payload.push(byte);
        }

        Ok(payload)
    }
}
