//! # Capacity Model
//!
//! Capacity is a property of a carrier *instance*: `units - header_bits`. For
//! images and audio the unit count is closed-form (channels, samples); for text
//! it comes from scanning the cover, so every query goes through
//! [`Carrier::unit_count`] rather than a formula.

use serde::{Deserialize, Serialize};

use super::text::TextMethod;
use super::{Carrier, Framer};

/// Usable payload bits once the header is accounted for.
pub fn capacity_bits<C: Carrier + ?Sized>(carrier: &C, framer: &Framer) -> usize {
    carrier.unit_count().saturating_sub(framer.header_bits())
}

/// Whether a payload of `payload_len` bytes can be framed into `carrier`.
///
/// Pure: never mutates the carrier and never fails.
pub fn fits<C: Carrier + ?Sized>(carrier: &C, framer: &Framer, payload_len: usize) -> bool {
    payload_len as u64 <= framer.max_payload_len()
        && framer.frame_bits(payload_len) <= carrier.unit_count() as u64
}

/// Largest payload, in whole bytes, that [`fits`].
pub fn max_payload_bytes<C: Carrier + ?Sized>(carrier: &C, framer: &Framer) -> usize {
    let by_units = capacity_bits(carrier, framer) / 8;
    usize::try_from(framer.max_payload_len()).map_or(by_units, |max| by_units.min(max))
}

/// Summary of a carrier's capacity, for "check before encode" workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityReport {
    /// Carrier kind (`image`, `audio` or `text`)
    pub kind: String,
    /// Text method the units were counted for, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<TextMethod>,
    /// Embeddable units found in the carrier
    pub units: usize,
    /// Bits reserved for the length header
    pub header_bits: usize,
    /// Units left for payload bits
    pub capacity_bits: usize,
    /// Largest payload that fits, in bytes
    pub max_payload_bytes: usize,
}

impl CapacityReport {
    pub fn measure<C: Carrier + ?Sized>(
        kind: &str,
        method: Option<TextMethod>,
        carrier: &C,
        framer: &Framer,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            method,
            units: carrier.unit_count(),
            header_bits: framer.header_bits(),
            capacity_bits: capacity_bits(carrier, framer),
            max_payload_bytes: max_payload_bytes(carrier, framer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FramingConfig;
    use crate::stego::tests::BitCarrier;

    #[test]
    fn test_capacity_bits() {
        let framer = Framer::default();
        assert_eq!(capacity_bits(&BitCarrier(vec![false; 48]), &framer), 16);
        assert_eq!(capacity_bits(&BitCarrier(vec![false; 10]), &framer), 0);
    }

    #[test]
    fn test_fits_boundary() {
        let framer = Framer::default();
        let carrier = BitCarrier(vec![false; 48]);

        assert!(fits(&carrier, &framer, 0));
        assert!(fits(&carrier, &framer, 2));
        assert!(!fits(&carrier, &framer, 3));
    }

    #[test]
    fn test_fits_needs_room_for_header() {
        let framer = Framer::default();
        let carrier = BitCarrier(vec![false; 31]);

        assert!(!fits(&carrier, &framer, 0));
    }

    #[test]
    fn test_fits_is_monotonic() {
        let framer = Framer::default();
        let carrier = BitCarrier(vec![false; 32 + 8 * 10 + 5]);

        let largest = (0..20).filter(|len| fits(&carrier, &framer, *len)).max();
        assert_eq!(largest, Some(10));
        assert!((0..=10).all(|len| fits(&carrier, &framer, len)));
    }

    #[test]
    fn test_max_payload_limited_by_header() {
        let framer = Framer::new(FramingConfig { header_bits: 4 }).unwrap();
        let carrier = BitCarrier(vec![false; 1000]);

        assert_eq!(max_payload_bytes(&carrier, &framer), 15);
        assert!(!fits(&carrier, &framer, 16));
    }

    #[test]
    fn test_report() {
        let framer = Framer::default();
        let report = CapacityReport::measure("image", None, &BitCarrier(vec![false; 48]), &framer);

        assert_eq!(report.units, 48);
        assert_eq!(report.header_bits, 32);
        assert_eq!(report.capacity_bits, 16);
        assert_eq!(report.max_payload_bytes, 2);
    }
}
