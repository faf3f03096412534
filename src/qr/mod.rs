//! QR code encoding
//!
//! Symbol settings, the payload wrapper fed to the encoder, and the encoder
//! that turns a payload into a two-color raster.

mod encoder;

pub use encoder::{EncodedQr, QrEncoder};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest QR version defined by the standard.
pub const MAX_VERSION: i16 = 40;

/// Bytes placed into a QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// The raw payload data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a new QR payload from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let text = String::from_utf8(data.clone()).ok();
        Self { data, text }
    }

    /// Create a new QR payload from a string
    pub fn from_string(s: String) -> Self {
        Self {
            data: s.as_bytes().to_vec(),
            text: Some(s),
        }
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Error correction level of a QR symbol
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    /// About 7% of codewords recoverable
    Low,
    /// About 15% of codewords recoverable
    Medium,
    /// About 25% of codewords recoverable
    Quartile,
    /// About 30% of codewords recoverable
    High,
}

impl ErrorCorrection {
    /// Parse a level name (case-insensitive). Accepts full names and the
    /// single-letter forms `l`, `m`, `q`, `h`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "l" => Some(Self::Low),
            "medium" | "m" => Some(Self::Medium),
            "quartile" | "q" => Some(Self::Quartile),
            "high" | "h" => Some(Self::High),
            _ => None,
        }
    }

    /// Lowercase label used in config files and rendered output
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Quartile => "quartile",
            Self::High => "high",
        }
    }

    pub(crate) fn to_ec_level(self) -> qrcode::EcLevel {
        match self {
            Self::Low => qrcode::EcLevel::L,
            Self::Medium => qrcode::EcLevel::M,
            Self::Quartile => qrcode::EcLevel::Q,
            Self::High => qrcode::EcLevel::H,
        }
    }

    pub(crate) fn from_ec_level(level: qrcode::EcLevel) -> Self {
        match level {
            qrcode::EcLevel::L => Self::Low,
            qrcode::EcLevel::M => Self::Medium,
            qrcode::EcLevel::Q => Self::Quartile,
            qrcode::EcLevel::H => Self::High,
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            format!("Unsupported error correction '{value}', expected low, medium, quartile or high")
        })
    }
}

/// Parameters of the generated symbol and its raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrSettings {
    /// Requested symbol version (1..=40)
    pub version: i16,
    /// Error correction level
    pub error_correction: ErrorCorrection,
    /// Pixel width of one module
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    /// Move to a larger version when the payload does not fit
    pub fit: bool,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            version: 1,
            error_correction: ErrorCorrection::Low,
            box_size: 10,
            border: 4,
            fit: true,
        }
    }
}

impl QrSettings {
    /// Check that the settings describe a symbol that can be rendered
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_VERSION).contains(&self.version) {
            return Err(Error::Config(format!(
                "QR version {} out of range, expected 1..={MAX_VERSION}",
                self.version
            )));
        }
        if self.box_size == 0 {
            return Err(Error::Config("QR box size must be at least 1 pixel".to_string()));
        }
        Ok(())
    }
}

/// Description of a symbol produced by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymbolInfo {
    /// Version the payload was encoded with
    pub version: i16,
    /// Error correction level of the symbol
    pub error_correction: ErrorCorrection,
    /// Symbol width in modules, excluding the border
    pub width_modules: u32,
    /// Pixel width of one module
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    /// Raster width in pixels
    pub image_width: u32,
    /// Raster height in pixels
    pub image_height: u32,
}
