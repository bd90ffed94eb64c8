//! Join-URL QR code generation.
//!
//! One pure function: URL in, PNG on disk out. Rendering uses
//! error-correction level M with 10-pixel modules and the standard
//! 4-module quiet zone.

use std::path::Path;

use image::Luma;
use qrcode::{EcLevel, QrCode};

use crate::error::RelayError;

/// Pixel edge length of one QR module.
const MODULE_PIXELS: u32 = 10;

/// Encodes `url` as a QR code and writes it to `output_path` as a PNG.
///
/// # Errors
///
/// Returns [`RelayError::Qr`] when the payload does not fit a QR code,
/// and [`RelayError::Storage`] when the PNG cannot be written.
pub fn generate_qr(url: &str, output_path: &Path) -> Result<(), RelayError> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)
        .map_err(|err| RelayError::Qr(err.to_string()))?;

    let img = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .build();

    img.save(output_path).map_err(|err| match err {
        image::ImageError::IoError(io_err) => RelayError::Storage(io_err),
        other => RelayError::Qr(other.to_string()),
    })
}
