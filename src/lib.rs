//! machineqr - QR codes for recycling machine point records
//!
//! Builds a [`MachineRecord`] (machine name + points), serializes it to
//! compact JSON, encodes the text into a QR symbol and writes the black on
//! white raster to a PNG file.
//!
//! # Example
//!
//! ```no_run
//! use machineqr::{MachineRecord, QrGenerator, QrSettings};
//!
//! fn main() -> machineqr::Result<()> {
//!     let generator = QrGenerator::new(QrSettings::default());
//!     let generated = generator.generate(&MachineRecord::default(), "qr-code.png")?;
//!
//!     println!("Encoded with version {}", generated.symbol.version);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod qr;
pub mod record;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{LogRotation, LoggingOptions, MachineQrConfig, OutputOptions};
pub use qr::{EncodedQr, ErrorCorrection, QrEncoder, QrPayload, QrSettings, SymbolInfo};
pub use record::MachineRecord;

use std::path::{Path, PathBuf};

/// Result of writing one record to disk
#[derive(Debug, Clone)]
pub struct GeneratedQr {
    /// File the PNG was written to
    pub path: PathBuf,
    /// Payload placed in the code
    pub payload: QrPayload,
    /// Version, level and geometry of the written symbol
    pub symbol: SymbolInfo,
}

/// High-level interface: record in, PNG file out
#[derive(Debug, Clone, Default)]
pub struct QrGenerator {
    encoder: QrEncoder,
}

impl QrGenerator {
    /// Create a generator rendering with the given settings
    pub fn new(settings: QrSettings) -> Self {
        Self {
            encoder: QrEncoder::with_settings(settings),
        }
    }

    /// Create a generator from a loaded configuration
    pub fn from_config(config: &MachineQrConfig) -> Self {
        Self::new(config.qr)
    }

    /// Serialize and encode a record without touching the filesystem
    pub fn encode(&self, record: &MachineRecord) -> Result<(QrPayload, EncodedQr)> {
        let payload = record.to_payload()?;
        tracing::debug!(
            machine = %record.machine_name,
            points = record.points,
            bytes = payload.as_bytes().len(),
            "Serialized machine record"
        );

        let encoded = self.encoder.encode(&payload)?;
        Ok((payload, encoded))
    }

    /// Encode a record and write it as PNG to `path`, replacing any existing file
    pub fn generate(&self, record: &MachineRecord, path: impl AsRef<Path>) -> Result<GeneratedQr> {
        let path = path.as_ref();
        let (payload, encoded) = self.encode(record)?;
        output::save_png(&encoded.image, path)?;

        Ok(GeneratedQr {
            path: path.to_path_buf(),
            payload,
            symbol: encoded.symbol,
        })
    }
}
