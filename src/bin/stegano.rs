//! # Stegano Binary Entry Point
//!
//! Thin command-line front end over the [`Dispatcher`]: file loading, argument
//! parsing and user-facing messages live here, the codec lives in the library.
//!
//! ## Usage
//!
//! ```bash
//! # Hide a message in an image
//! stegano encode -i cover.png -o secret.png -m "meet at noon"
//!
//! # Hide a whole file in a WAV
//! stegano encode -i cover.wav -o secret.wav -f notes.pdf
//!
//! # Hide a message in text with zero-width characters
//! stegano encode -i cover.txt -o secret.txt -m "hi" --text-method zero-width
//!
//! # Recover it (text method is auto-detected unless given)
//! stegano decode -i secret.txt
//!
//! # Check how much fits before encoding
//! stegano capacity -i cover.png --json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{debug, error, info, LevelFilter};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stegano_sec::media::{load_carrier, save_carrier};
use stegano_sec::stego::CapacityReport;
use stegano_sec::{CarrierData, CarrierKind, Dispatcher, StegoConfig, StegoError, TextMethod};

/// Command-line arguments for the stegano binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    ///
    /// Example: stegano.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide a message or file inside an image, audio or text carrier
    Encode {
        /// Cover file (.png, .jpg, .jpeg, .bmp, .wav, .txt, .md)
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the carrier with the hidden payload
        #[arg(short, long)]
        output: PathBuf,

        /// Message to hide
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        message: Option<String>,

        /// File whose bytes should be hidden
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Text method (text carriers only)
        #[arg(long, value_enum)]
        text_method: Option<MethodArg>,
    },

    /// Recover a hidden payload
    Decode {
        /// Carrier file holding a hidden payload
        #[arg(short, long)]
        input: PathBuf,

        /// Write the recovered bytes here instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Text method (text carriers only, auto-detected by default)
        #[arg(long, value_enum, default_value_t = MethodArg::Auto)]
        text_method: MethodArg,
    },

    /// Show how large a payload a carrier can hold
    Capacity {
        /// Carrier file to inspect
        #[arg(short, long)]
        input: PathBuf,

        /// Text method to count units for (both when omitted)
        #[arg(long, value_enum)]
        text_method: Option<MethodArg>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    Auto,
    Whitespace,
    #[value(alias = "zero_width")]
    ZeroWidth,
}

impl MethodArg {
    fn method(self) -> Option<TextMethod> {
        match self {
            MethodArg::Auto => None,
            MethodArg::Whitespace => Some(TextMethod::Whitespace),
            MethodArg::ZeroWidth => Some(TextMethod::ZeroWidth),
        }
    }
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// INFO level by default, DEBUG with `--verbose`.
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger(verbose: bool) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("✗ {}", describe(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => StegoConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => StegoConfig::default(),
    };
    let dispatcher = Dispatcher::new(config)?;

    match args.command {
        Command::Encode {
            input,
            output,
            message,
            file,
            text_method,
        } => encode(
            &dispatcher,
            &input,
            &output,
            message,
            file,
            text_method.and_then(MethodArg::method),
        ),
        Command::Decode {
            input,
            output,
            text_method,
        } => decode(&dispatcher, &input, output.as_deref(), text_method.method()),
        Command::Capacity {
            input,
            text_method,
            json,
        } => capacity(&dispatcher, &input, text_method.and_then(MethodArg::method), json),
    }
}

fn encode(
    dispatcher: &Dispatcher,
    input: &Path,
    output: &Path,
    message: Option<String>,
    file: Option<PathBuf>,
    method: Option<TextMethod>,
) -> anyhow::Result<()> {
    let payload = match (message, file) {
        (Some(message), _) => message.into_bytes(),
        (None, Some(file)) => {
            fs::read(&file).with_context(|| format!("failed to read {}", file.display()))?
        }
        (None, None) => anyhow::bail!("either --message or --file must be provided"),
    };

    // fail on a bad output extension before doing any work
    let output_kind = CarrierKind::from_path(output)?;
    let carrier = load_carrier(input, dispatcher.config())?;
    if output_kind != carrier.kind() {
        return Err(StegoError::UnsupportedFormat(format!(
            "output must be a {} file like the input",
            carrier.kind()
        ))
        .into());
    }

    let report = dispatcher.capacity(&carrier, method);
    info!(
        "📦 Hiding {} bytes in {} ({} bytes available)",
        payload.len(),
        input.display(),
        report.max_payload_bytes
    );

    let encoded = dispatcher.encode(&carrier, &payload, method)?;
    save_carrier(&encoded, output)?;

    println!("✓ Payload successfully encoded into {}", output.display());
    println!("  Hidden payload size: {} bytes", payload.len());
    println!("  Carrier capacity: {} bytes", report.max_payload_bytes);
    if let Some(method) = report.method {
        println!("  Text method: {method}");
    }
    Ok(())
}

fn decode(
    dispatcher: &Dispatcher,
    input: &Path,
    output: Option<&Path>,
    method: Option<TextMethod>,
) -> anyhow::Result<()> {
    let carrier = load_carrier(input, dispatcher.config())?;
    let payload = dispatcher.decode(&carrier, method)?;
    info!("🔍 Recovered {} bytes from {}", payload.len(), input.display());

    if let Some(output) = output {
        fs::write(output, &payload)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("✓ Decoded payload saved to {}", output.display());
        return Ok(());
    }

    match String::from_utf8(payload) {
        Ok(message) => {
            let rule = "=".repeat(50);
            println!("{rule}");
            println!("DECODED MESSAGE:");
            println!("{rule}");
            println!("{message}");
            println!("{rule}");
        }
        Err(e) => {
            debug!("Payload is not UTF-8: {}", e);
            println!(
                "✓ Decoded {} bytes of binary data; use --output to save them",
                e.as_bytes().len()
            );
        }
    }
    Ok(())
}

fn capacity(
    dispatcher: &Dispatcher,
    input: &Path,
    method: Option<TextMethod>,
    json: bool,
) -> anyhow::Result<()> {
    let carrier = load_carrier(input, dispatcher.config())?;

    let reports: Vec<CapacityReport> = match (&carrier, method) {
        (CarrierData::Text(_), None) => TextMethod::ALL
            .iter()
            .map(|method| dispatcher.capacity(&carrier, Some(*method)))
            .collect(),
        _ => vec![dispatcher.capacity(&carrier, method)],
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        match report.method {
            Some(method) => println!("{} capacity ({method}):", report.kind),
            None => println!("{} capacity:", report.kind),
        }
        println!("  Embeddable units: {}", report.units);
        println!("  Header: {} bits", report.header_bits);
        println!("  Payload capacity: {} bits", report.capacity_bits);
        println!("  Max payload: {} bytes", report.max_payload_bytes);
    }
    Ok(())
}

/// User-facing message for an error, specific to each codec failure.
fn describe(error: &anyhow::Error) -> String {
    let Some(stego) = error.downcast_ref::<StegoError>() else {
        return format!("{error:#}");
    };

    match stego {
        StegoError::CapacityExceeded { needed, available } => format!(
            "Payload too large: it needs {needed} bits but the carrier only has {available}. \
             Use a larger carrier or a smaller payload."
        ),
        StegoError::InsufficientCarrier { needed, available } => format!(
            "Carrier too small: even the {needed}-bit length header does not fit in {available} units."
        ),
        StegoError::TruncatedData { needed, remaining } => format!(
            "No valid hidden payload: the header declares {needed} bits but only {remaining} remain."
        ),
        StegoError::UnknownEncoding => {
            "No hidden message found using any text method.".to_string()
        }
        StegoError::UnsupportedFormat(detail) => format!("Unsupported format: {detail}"),
        other => other.to_string(),
    }
}
