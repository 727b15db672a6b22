//! # stegano-sec
//!
//! Multi-carrier LSB steganography: hide an arbitrary byte payload in the low
//! bits of image pixels, PCM audio samples, or the whitespace and zero-width
//! marks of plain text, and recover it exactly.
//!
//! ## Modules
//!
//! - [`stego`]: Framer, capacity model and the per-format carriers
//! - [`dispatcher`]: One encode/decode/capacity surface over every carrier kind
//! - [`media`]: Loading and saving carriers from files
//! - [`config`]: Codec configuration and TOML loading
//! - [`error`]: Error taxonomy
//!
//! The codec does no encryption and no error correction; carriers must be stored
//! losslessly between encode and decode.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod media;
pub mod stego;

pub use config::StegoConfig;
pub use dispatcher::{CarrierData, CarrierKind, Dispatcher};
pub use error::{Result, StegoError};
pub use stego::TextMethod;
