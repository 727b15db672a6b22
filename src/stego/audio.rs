//! # Audio LSB Carrier
//!
//! Hides one bit in the least significant bit of every PCM sample, in
//! interleaved order (frame 0 channel 0, frame 0 channel 1, frame 1 channel 0, ...).
//!
//! Capacity is `frames * channels` units whatever the bit depth, since only the
//! LSB is used. The [`WavSpec`] travels with the samples and is never modified, so
//! sample rate, channel count and depth are identical on output.

use hound::{SampleFormat, WavSpec};

use crate::error::{Result, StegoError};

use super::Carrier;

/// Integer PCM samples at one of the supported widths.
///
/// 8-bit WAV data is unsigned on disk; `hound` recentres it to `i8`, which does
/// not change the LSB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PcmSamples {
    Eight(Vec<i8>),
    Sixteen(Vec<i16>),
    ThirtyTwo(Vec<i32>),
}

impl PcmSamples {
    pub fn len(&self) -> usize {
        match self {
            Self::Eight(samples) => samples.len(),
            Self::Sixteen(samples) => samples.len(),
            Self::ThirtyTwo(samples) => samples.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bits_per_sample(&self) -> u16 {
        match self {
            Self::Eight(_) => 8,
            Self::Sixteen(_) => 16,
            Self::ThirtyTwo(_) => 32,
        }
    }
}

/// Decoded PCM stream used as a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioCarrier {
    spec: WavSpec,
    samples: PcmSamples,
}

impl AudioCarrier {
    /// Pair samples with their format metadata.
    ///
    /// # Errors
    /// `UnsupportedFormat` when the spec is not integer PCM, declares no channels,
    /// or its bit depth does not match the sample width.
    pub fn new(spec: WavSpec, samples: PcmSamples) -> Result<Self> {
        if spec.sample_format != SampleFormat::Int {
            return Err(StegoError::UnsupportedFormat(
                "floating point audio is not supported, only integer PCM".to_string(),
            ));
        }
        if spec.channels == 0 {
            return Err(StegoError::UnsupportedFormat(
                "audio declares zero channels".to_string(),
            ));
        }
        if spec.bits_per_sample != samples.bits_per_sample() {
            return Err(StegoError::UnsupportedFormat(format!(
                "spec declares {} bits per sample but samples are {}-bit",
                spec.bits_per_sample,
                samples.bits_per_sample()
            )));
        }

        Ok(Self { spec, samples })
    }

    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    pub fn samples(&self) -> &PcmSamples {
        &self.samples
    }

    /// Sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.spec.channels as usize
    }

    pub fn into_parts(self) -> (WavSpec, PcmSamples) {
        (self.spec, self.samples)
    }
}

impl Carrier for AudioCarrier {
    fn unit_count(&self) -> usize {
        self.samples.len()
    }

    fn read_unit(&self, index: usize) -> bool {
        match &self.samples {
            PcmSamples::Eight(samples) => samples[index] & 1 != 0,
            PcmSamples::Sixteen(samples) => samples[index] & 1 != 0,
            PcmSamples::ThirtyTwo(samples) => samples[index] & 1 != 0,
        }
    }

    fn write_unit(&mut self, index: usize, bit: bool) {
        match &mut self.samples {
            PcmSamples::Eight(samples) => samples[index] = (samples[index] & !1) | i8::from(bit),
            PcmSamples::Sixteen(samples) => {
                samples[index] = (samples[index] & !1) | i16::from(bit)
            }
            PcmSamples::ThirtyTwo(samples) => {
                samples[index] = (samples[index] & !1) | i32::from(bit)
            }
        }
    }
}
