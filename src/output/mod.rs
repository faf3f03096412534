//! Writing generated codes to disk and rendering the confirmation

use crate::GeneratedQr;
use crate::error::Result;
use hex::encode as hex_encode;
use image::{GrayImage, ImageFormat};
use serde_json::{Value, json};
use std::path::Path;

/// File name written when no other output path is configured
pub const DEFAULT_OUTPUT_FILE: &str = "qr-code.png";

/// Combined structured and human-readable confirmation of a generated code
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable confirmation line
    pub human: String,
}

/// Write the raster as PNG, replacing any existing file at `path`.
pub fn save_png(image: &GrayImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "QR code image written"
    );
    Ok(())
}

/// Render a generated code into both JSON and human-readable forms.
pub fn render_generated(generated: &GeneratedQr) -> RenderedOutput {
    let human = format!(
        "QR code generated and saved as {}",
        generated.path.display()
    );
    RenderedOutput {
        json: generated_value(generated),
        human,
    }
}

/// Produce a structured JSON representation of a generated code.
pub fn generated_value(generated: &GeneratedQr) -> Value {
    let symbol = &generated.symbol;
    json!({
        "path": generated.path.display().to_string(),
        "payload": {
            "text": generated.payload.as_str(),
            "bytes_hex": hex_encode(generated.payload.as_bytes()),
            "byte_length": generated.payload.as_bytes().len(),
        },
        "symbol": {
            "version": symbol.version,
            "error_correction": symbol.error_correction.label(),
            "width_modules": symbol.width_modules,
            "box_size": symbol.box_size,
            "border": symbol.border,
            "image_width": symbol.image_width,
            "image_height": symbol.image_height,
        },
    })
}
