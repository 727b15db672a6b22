use hound::{SampleFormat, WavSpec};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stegano_sec::config::{FramingConfig, ImageConfig};
use stegano_sec::stego::{AudioCarrier, ImageCarrier, PcmSamples};
use stegano_sec::{CarrierData, Dispatcher, StegoConfig, StegoError, TextMethod};

fn dispatcher() -> Dispatcher {
    Dispatcher::new(StegoConfig::default()).unwrap()
}

fn random_payload(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}

fn noisy_image(rng: &mut StdRng, width: u32, height: u32) -> CarrierData {
    let pixels = RgbImage::from_fn(width, height, |_, _| Rgb([rng.gen(), rng.gen(), rng.gen()]));
    CarrierData::Image(ImageCarrier::from_rgb(pixels, ImageConfig::default()))
}

fn noisy_audio(rng: &mut StdRng, samples: usize) -> CarrierData {
    let spec = WavSpec {
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let samples = PcmSamples::Sixteen((0..samples).map(|_| rng.gen()).collect());
    CarrierData::Audio(AudioCarrier::new(spec, samples).unwrap())
}

fn prose(words: usize) -> CarrierData {
    let text = (0..words)
        .map(|i| match i % 4 {
            0 => "lorem",
            1 => "ipsum",
            2 => "dolor",
            _ => "sit",
        })
        .collect::<Vec<_>>()
        .join(" ");
    CarrierData::Text(text)
}

#[test]
fn test_roundtrip_every_carrier() {
    let dispatcher = dispatcher();
    let mut rng = StdRng::seed_from_u64(7);

    let cases = [
        (noisy_image(&mut rng, 40, 30), None),
        (noisy_audio(&mut rng, 5000), None),
        (prose(600), Some(TextMethod::Whitespace)),
        (prose(200), Some(TextMethod::ZeroWidth)),
    ];

    for (carrier, method) in cases {
        let max = dispatcher.capacity(&carrier, method).max_payload_bytes;
        for len in [0, 1, max / 2, max] {
            let payload = random_payload(&mut rng, len);
            assert!(dispatcher.fits(&carrier, &payload, method));

            let encoded = dispatcher.encode(&carrier, &payload, method).unwrap();
            assert_eq!(encoded.kind(), carrier.kind());
            assert_eq!(dispatcher.decode(&encoded, method).unwrap(), payload);
        }
    }
}

#[test]
fn test_scenario_4x4_rgb() {
    let dispatcher = dispatcher();
    let cover = CarrierData::Image(ImageCarrier::from_rgb(
        RgbImage::from_pixel(4, 4, Rgb([200, 100, 50])),
        ImageConfig::default(),
    ));

    let report = dispatcher.capacity(&cover, None);
    assert_eq!(report.units, 48);
    assert_eq!(report.capacity_bits, 16);
    assert_eq!(report.max_payload_bytes, 2);

    let encoded = dispatcher.encode(&cover, b"Hi", None).unwrap();
    assert_eq!(dispatcher.decode(&encoded, None).unwrap(), b"Hi");

    assert!(matches!(
        dispatcher.encode(&cover, b"Hit", None),
        Err(StegoError::CapacityExceeded { needed: 56, available: 48 })
    ));
}

#[test]
fn test_boundary_is_exact() {
    // a header width that makes the carrier size an exact frame boundary
    let config = StegoConfig {
        framing: FramingConfig { header_bits: 12 },
        ..StegoConfig::default()
    };
    let dispatcher = Dispatcher::new(config).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let cover = noisy_audio(&mut rng, 12 + 8 * 25);

    let exact = random_payload(&mut rng, 25);
    let encoded = dispatcher.encode(&cover, &exact, None).unwrap();
    assert_eq!(dispatcher.decode(&encoded, None).unwrap(), exact);

    let over = random_payload(&mut rng, 26);
    assert!(matches!(
        dispatcher.encode(&cover, &over, None),
        Err(StegoError::CapacityExceeded { .. })
    ));
}

#[test]
fn test_fits_is_pure_and_monotonic() {
    let dispatcher = dispatcher();
    let mut rng = StdRng::seed_from_u64(3);
    let cover = noisy_image(&mut rng, 10, 10);
    let snapshot = cover.clone();

    let verdicts: Vec<bool> = (0..120)
        .map(|len| dispatcher.fits(&cover, &vec![0u8; len], None))
        .collect();
    let again: Vec<bool> = (0..120)
        .map(|len| dispatcher.fits(&cover, &vec![0u8; len], None))
        .collect();

    assert_eq!(verdicts, again);
    assert_eq!(cover, snapshot);

    // once a length fails, every longer one fails too
    let first_failure = verdicts.iter().position(|fits| !fits).unwrap();
    assert_eq!(first_failure, (300 - 32) / 8 + 1);
    assert!(verdicts[first_failure..].iter().all(|fits| !fits));
}

#[test]
fn test_failed_encode_is_non_destructive() {
    let dispatcher = dispatcher();
    let mut rng = StdRng::seed_from_u64(5);

    for carrier in [noisy_image(&mut rng, 3, 3), noisy_audio(&mut rng, 40), prose(10)] {
        let before = carrier.clone();
        let result = dispatcher.encode(&carrier, &[1, 2, 3, 4, 5, 6, 7, 8], None);

        assert!(matches!(result, Err(StegoError::CapacityExceeded { .. })));
        assert_eq!(carrier, before);
    }
}

#[test]
fn test_empty_payload_everywhere() {
    let dispatcher = dispatcher();
    let mut rng = StdRng::seed_from_u64(9);

    let cases = [
        (noisy_image(&mut rng, 4, 4), None),
        (noisy_audio(&mut rng, 64), None),
        (prose(40), Some(TextMethod::Whitespace)),
        (prose(40), Some(TextMethod::ZeroWidth)),
    ];

    for (carrier, method) in cases {
        let encoded = dispatcher.encode(&carrier, b"", method).unwrap();
        assert!(dispatcher.decode(&encoded, method).unwrap().is_empty());
    }
}

#[test]
fn test_image_channel_isolation() {
    let dispatcher = dispatcher();
    let mut rng = StdRng::seed_from_u64(13);
    let pixels = RgbaImage::from_fn(12, 12, |_, _| Rgba([rng.gen(), rng.gen(), rng.gen(), rng.gen()]));
    let cover = CarrierData::Image(ImageCarrier::from_rgba(pixels.clone(), ImageConfig::default()));

    let payload = random_payload(&mut rng, 40);
    let CarrierData::Image(encoded) = dispatcher.encode(&cover, &payload, None).unwrap() else {
        panic!("carrier kind changed");
    };

    for (before, after) in pixels.pixels().zip(encoded.pixels().pixels()) {
        for channel in 0..3 {
            assert_eq!(before[channel] >> 1, after[channel] >> 1);
        }
        assert_eq!(before[3], after[3]);
    }
}

#[test]
fn test_text_auto_detection() {
    let dispatcher = dispatcher();

    let zero_width = dispatcher
        .encode(&prose(100), b"zero width", Some(TextMethod::ZeroWidth))
        .unwrap();
    let CarrierData::Text(text) = zero_width else {
        panic!("carrier kind changed");
    };
    // unrelated whitespace edits do not disturb the marks
    let edited = CarrierData::Text(text.replace(' ', "  ").replace("sit", "sit\n"));
    assert_eq!(dispatcher.decode(&edited, None).unwrap(), b"zero width");

    let whitespace = dispatcher
        .encode(&prose(300), b"spaces", Some(TextMethod::Whitespace))
        .unwrap();
    assert_eq!(dispatcher.decode(&whitespace, None).unwrap(), b"spaces");

    let plain = CarrierData::Text("just a short note".to_string());
    assert!(matches!(
        dispatcher.decode(&plain, None),
        Err(StegoError::UnknownEncoding)
    ));
}

#[test]
fn test_plain_prose_has_no_hidden_message() {
    let dispatcher = dispatcher();
    let plain = CarrierData::Text("The quick brown fox jumps over the lazy dog. ".repeat(5));

    assert!(matches!(
        dispatcher.decode(&plain, None),
        Err(StegoError::UnknownEncoding)
    ));
    assert!(dispatcher
        .decode(&plain, Some(TextMethod::Whitespace))
        .unwrap()
        .is_empty());
}
