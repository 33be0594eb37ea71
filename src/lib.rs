//! # qrforge
//!
//! A Rust library for generating version 2 QR code symbols (25x25 modules) at error correction
//! level M, with Reed-Solomon error correction and penalty-scored data masking.
//!
//! ## Features
//!
//! - **Alphanumeric encoding**: Digits, uppercase letters and ` $%*+-./:`, up to 38 characters
//! - **Byte encoding**: Arbitrary bytes, up to 26 bytes
//! - **Reed-Solomon Error Correction**: 16 error correction codewords over GF(256)
//! - **Mask Selection**: All 8 mask patterns scored with the standard penalty rules, or a forced pattern
//! - **Raw Output**: The module matrix as a boolean grid or packed into 79 bytes
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = qrforge::generate("HELLO WORLD")?;
//!
//! assert_eq!(qr.width(), 25);
//! assert_eq!(qr.to_raw_bytes().len(), 79);
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrforge::{MaskPattern, Mode, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"hello, world")
//!     .mode(Mode::Byte)             // Encoding mode - if not provided, defaults to Mode::Alphanumeric
//!     .mask(MaskPattern::new(3))    // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! let matrix = qr.matrix();
//! assert!(matrix[0][0]);            // Top left finder pattern
//! # Ok(())
//! # }
//! ```
//!
//! ### Capacity Planning
//!
//! ```rust
//! use qrforge::{bit_len, Mode, DATA_BIT_CAPACITY};
//!
//! assert_eq!(bit_len(Mode::Alphanumeric, 38), 222);
//! assert!(bit_len(Mode::Alphanumeric, 39) > DATA_BIT_CAPACITY);
//! assert_eq!(bit_len(Mode::Byte, 26), 221);
//! ```
//!
//! ### Errors
//!
//! ```rust
//! use qrforge::QRError;
//!
//! assert_eq!(qrforge::generate("hello").unwrap_err(), QRError::InvalidChar);
//! assert_eq!(qrforge::generate(&"A".repeat(39)).unwrap_err(), QRError::DataTooLong);
//! ```
//!
//! ## Logging
//!
//! Generation steps are reported through [`tracing`] at debug level, and every mask candidate's
//! penalty breakdown at trace level. No subscriber is installed by the library.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::{bit_len, Mode};
pub use common::error::{QRError, QRResult};
pub use common::mask::{compute_penalty, compute_total_penalty, MaskPattern, Penalty};
pub use common::metadata::{
    format_info, Color, ECLevel, DARK_MODULE, DATA_BIT_CAPACITY, EC_INFO, QR_WIDTH, VERSION,
};

/// Generates a symbol from alphanumeric text
pub fn generate(text: &str) -> QRResult<QR> {
    QRBuilder::new(text.as_bytes()).build()
}

/// Generates a symbol from raw bytes in byte mode
pub fn generate_bytes(data: &[u8]) -> QRResult<QR> {
    QRBuilder::new(data).mode(Mode::Byte).build()
}
