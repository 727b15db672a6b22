//! # Media I/O
//!
//! Loads carriers from files (or in-memory bytes) into their decoded form and
//! writes encoded carriers back out. The codec itself never touches the
//! filesystem; this module is the boundary that does.
//!
//! ## Formats
//! - Images: PNG, JPEG and BMP in; PNG and BMP out. JPEG output is refused
//!   because lossy recompression destroys the LSBs.
//! - Audio: integer PCM WAV at 8, 16 or 32 bits per sample, in and out.
//! - Text: UTF-8 `.txt` and `.md` files, in and out.

use hound::{SampleFormat, WavReader, WavWriter};
use image::ImageFormat;
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use crate::config::{ImageConfig, StegoConfig};
use crate::dispatcher::{CarrierData, CarrierKind};
use crate::error::{Result, StegoError};
use crate::stego::{AudioCarrier, ImageCarrier, PcmSamples};

/// Load a carrier of the kind implied by the file extension.
pub fn load_carrier<P: AsRef<Path>>(path: P, config: &StegoConfig) -> Result<CarrierData> {
    let path = path.as_ref();
    let carrier = match CarrierKind::from_path(path)? {
        CarrierKind::Image => CarrierData::Image(load_image(path, config.image)?),
        CarrierKind::Audio => CarrierData::Audio(load_wav(path)?),
        CarrierKind::Text => CarrierData::Text(load_text(path)?),
    };

    debug!("Loaded {} carrier from {}", carrier.kind(), path.display());
    Ok(carrier)
}

/// Write a carrier to `path`.
///
/// # Errors
/// `UnsupportedFormat` when the extension does not match the carrier kind, or
/// names a lossy image container.
pub fn save_carrier<P: AsRef<Path>>(carrier: &CarrierData, path: P) -> Result<()> {
    let path = path.as_ref();
    let kind = CarrierKind::from_path(path)?;
    if kind != carrier.kind() {
        return Err(StegoError::UnsupportedFormat(format!(
            "cannot write {} carrier to {} file '{}'",
            carrier.kind(),
            kind,
            path.display()
        )));
    }

    match carrier {
        CarrierData::Image(image) => save_image(image, path)?,
        CarrierData::Audio(audio) => save_wav(audio, path)?,
        CarrierData::Text(text) => save_text(text, path)?,
    }

    debug!("Saved {} carrier to {}", carrier.kind(), path.display());
    Ok(())
}

// ========== IMAGES ==========

pub fn load_image<P: AsRef<Path>>(path: P, config: ImageConfig) -> Result<ImageCarrier> {
    let image = image::open(path)?;
    ImageCarrier::from_dynamic(&image, config)
}

/// Decode an image from raw bytes in any format the `image` crate recognises.
pub fn image_from_bytes(bytes: &[u8], config: ImageConfig) -> Result<ImageCarrier> {
    let image = image::load_from_memory(bytes)?;
    ImageCarrier::from_dynamic(&image, config)
}

/// Write an image carrier to a lossless file (format chosen by extension).
pub fn save_image<P: AsRef<Path>>(carrier: &ImageCarrier, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = lossless_format(path)?;
    carrier.clone().into_dynamic().save_with_format(path, format)?;
    Ok(())
}

/// Encode an image carrier as PNG bytes.
pub fn image_to_png_bytes(carrier: &ImageCarrier) -> Result<Vec<u8>> {
    let mut output_bytes = Vec::new();
    carrier
        .clone()
        .into_dynamic()
        .write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)?;
    Ok(output_bytes)
}

fn lossless_format(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => Ok(ImageFormat::Png),
        "bmp" => Ok(ImageFormat::Bmp),
        "jpg" | "jpeg" => Err(StegoError::UnsupportedFormat(
            "JPEG is lossy and would destroy the hidden data; save as .png or .bmp".to_string(),
        )),
        other => Err(StegoError::UnsupportedFormat(format!(
            "cannot write images as '.{other}'; save as .png or .bmp"
        ))),
    }
}

// ========== AUDIO ==========

pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<AudioCarrier> {
    read_wav(WavReader::open(path)?)
}

pub fn wav_from_bytes(bytes: &[u8]) -> Result<AudioCarrier> {
    read_wav(WavReader::new(Cursor::new(bytes))?)
}

pub fn save_wav<P: AsRef<Path>>(carrier: &AudioCarrier, path: P) -> Result<()> {
    write_wav(carrier, BufWriter::new(File::create(path)?))
}

pub fn wav_to_bytes(carrier: &AudioCarrier) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_wav(carrier, Cursor::new(&mut bytes))?;
    Ok(bytes)
}

fn read_wav<R: Read>(reader: WavReader<R>) -> Result<AudioCarrier> {
    let spec = reader.spec();
    debug!(
        "WAV: {} channels, {} Hz, {} bits {:?}, {} samples",
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format,
        reader.len()
    );

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => PcmSamples::Eight(
            reader
                .into_samples::<i8>()
                .collect::<std::result::Result<_, _>>()?,
        ),
        (SampleFormat::Int, 16) => PcmSamples::Sixteen(
            reader
                .into_samples::<i16>()
                .collect::<std::result::Result<_, _>>()?,
        ),
        (SampleFormat::Int, 32) => PcmSamples::ThirtyTwo(
            reader
                .into_samples::<i32>()
                .collect::<std::result::Result<_, _>>()?,
        ),
        (format, bits) => {
            return Err(StegoError::UnsupportedFormat(format!(
                "{bits}-bit {format:?} WAV is not supported, only 8/16/32-bit integer PCM"
            )))
        }
    };

    AudioCarrier::new(spec, samples)
}

fn write_wav<W: Write + Seek>(carrier: &AudioCarrier, writer: W) -> Result<()> {
    let mut writer = WavWriter::new(writer, carrier.spec())?;

    match carrier.samples() {
        PcmSamples::Eight(samples) => {
            for sample in samples {
                writer.write_sample(*sample)?;
            }
        }
        PcmSamples::Sixteen(samples) => {
            for sample in samples {
                writer.write_sample(*sample)?;
            }
        }
        PcmSamples::ThirtyTwo(samples) => {
            for sample in samples {
                writer.write_sample(*sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

// ========== TEXT ==========

pub fn load_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(String::from_utf8(fs::read(path)?)?)
}

pub fn save_text<P: AsRef<Path>>(text: &str, path: P) -> Result<()> {
    fs::write(path, text)?;
    Ok(())
}
