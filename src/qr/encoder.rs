//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::{ErrorCorrection, MAX_VERSION, QrPayload, QrSettings, SymbolInfo};
use image::{GrayImage, Luma, imageops};
use qrcode::types::QrError;
use qrcode::{QrCode, Version};

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// A rendered QR symbol together with what was actually encoded
#[derive(Debug, Clone)]
pub struct EncodedQr {
    /// Black on white raster, quiet zone included
    pub image: GrayImage,
    /// Version, level and geometry of the symbol
    pub symbol: SymbolInfo,
}

/// QR code encoder
#[derive(Debug, Clone, Default)]
pub struct QrEncoder {
    settings: QrSettings,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings
    /// (version 1, low error correction, 10px modules, 4 module border, fit)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new QR encoder with specific settings
    pub fn with_settings(settings: QrSettings) -> Self {
        Self { settings }
    }

    /// Settings this encoder renders with
    pub fn settings(&self) -> &QrSettings {
        &self.settings
    }

    /// Encode a payload into a QR code raster
    pub fn encode(&self, payload: &QrPayload) -> Result<EncodedQr> {
        self.settings.validate()?;

        let code = self.build_code(payload.as_bytes())?;
        let version = match code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        };
        let width_modules = code.width() as u32;
        let side = self.image_side(width_modules)?;

        tracing::debug!(
            version,
            width_modules,
            side,
            bytes = payload.as_bytes().len(),
            "Encoded QR symbol"
        );

        let image = self.rasterize(&code, side);

        Ok(EncodedQr {
            image,
            symbol: SymbolInfo {
                version,
                error_correction: ErrorCorrection::from_ec_level(code.error_correction_level()),
                width_modules,
                box_size: self.settings.box_size,
                border: self.settings.border,
                image_width: side,
                image_height: side,
            },
        })
    }

    /// Encode a string into a QR code raster
    pub fn encode_string(&self, data: &str) -> Result<EncodedQr> {
        let payload = QrPayload::from_string(data.to_string());
        self.encode(&payload)
    }

    /// Find the symbol for `data`, starting at the configured version and,
    /// in fit mode, walking up until the payload fits.
    fn build_code(&self, data: &[u8]) -> Result<QrCode> {
        let requested = self.settings.version;
        let level = self.settings.error_correction;
        let last = if self.settings.fit { MAX_VERSION } else { requested };

        for version in requested..=last {
            match QrCode::with_version(data, Version::Normal(version), level.to_ec_level()) {
                Ok(code) => {
                    if version != requested {
                        tracing::info!(
                            requested,
                            version,
                            "Payload too long for requested version, using larger symbol"
                        );
                    }
                    return Ok(code);
                }
                Err(QrError::DataTooLong) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(Error::QrEncode(format!(
            "Payload of {} bytes does not fit in version {last} with {level} error correction",
            data.len()
        )))
    }

    fn image_side(&self, width_modules: u32) -> Result<u32> {
        width_modules
            .checked_add(self.settings.border.saturating_mul(2))
            .and_then(|modules| modules.checked_mul(self.settings.box_size))
            .ok_or_else(|| {
                Error::Config(format!(
                    "Image for {width_modules} modules with border {} and box size {} is too large",
                    self.settings.border, self.settings.box_size
                ))
            })
    }

    fn rasterize(&self, code: &QrCode, side: u32) -> GrayImage {
        let box_size = self.settings.box_size;
        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(box_size, box_size)
            .dark_color(DARK)
            .light_color(LIGHT)
            .build();

        let margin = i64::from(self.settings.border) * i64::from(box_size);
        let mut canvas = GrayImage::from_pixel(side, side, LIGHT);
        imageops::replace(&mut canvas, &symbol, margin, margin);
        canvas
    }
}
