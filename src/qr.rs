//! QR symbol generation and barcode decoding.
//!
//! Encoding renders at error-correction level H with a quiet zone, as a
//! grayscale PNG. Decoding accepts whatever bytes Telegram serves for a photo
//! (JPEG in practice) and scans for any common symbology, 2D or 1D; a missed
//! scan is reported as `Ok(None)` rather than an error, since that is a
//! user-facing outcome and not a fault.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use rxing::common::HybridBinarizer;
use rxing::{BinaryBitmap, Luma8LuminanceSource, MultiFormatReader, Reader};

use crate::error::HandlerError;

/// Pixels per QR module in the rendered image.
const MODULE_SCALE: u32 = 8;
/// Quiet zone around the symbol, in modules.
const QUIET_ZONE: u32 = 4;

/// Renders `payload` as a QR code PNG.
pub fn encode_png(payload: &str) -> Result<Vec<u8>, HandlerError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let side = (modules + 2 * QUIET_ZONE) * MODULE_SCALE;
    let img = GrayImage::from_fn(side, side, |x, y| {
        let mx = x / MODULE_SCALE;
        let my = y / MODULE_SCALE;
        let in_symbol = (QUIET_ZONE..QUIET_ZONE + modules).contains(&mx)
            && (QUIET_ZONE..QUIET_ZONE + modules).contains(&my);
        let dark = in_symbol
            && colors[((my - QUIET_ZONE) * modules + (mx - QUIET_ZONE)) as usize] == Color::Dark;
        if dark { Luma([0u8]) } else { Luma([255u8]) }
    });

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Builds the standard Wi-Fi network payload for a WPA-secured network, as
/// understood by phone camera apps: `WIFI:T:WPA;S:<ssid>;P:<password>;;`.
pub fn wifi_payload(ssid: &str, password: &str) -> String {
    format!(
        "WIFI:T:WPA;S:{};P:{};;",
        escape_wifi_field(ssid),
        escape_wifi_field(password)
    )
}

// The payload format reserves `\ ; , : "` in field values.
fn escape_wifi_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ';' | ',' | ':' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Scans `bytes` (PNG/JPEG/WebP) for a barcode of any supported symbology
/// (QR, Code 128, EAN, and the rest of the ZXing family) and returns its
/// payload.
///
/// `Ok(None)` means the image decoded fine but contained no readable code.
pub fn decode_image(bytes: &[u8]) -> Result<Option<String>, image::ImageError> {
    let luma = image::load_from_memory(bytes)?.to_luma8();
    let (width, height) = luma.dimensions();

    let source = Luma8LuminanceSource::new(luma.into_raw(), width, height);
    let mut bitmap = BinaryBitmap::new(HybridBinarizer::new(source));

    match MultiFormatReader::default().decode(&mut bitmap) {
        Ok(result) => Ok(Some(result.getText().to_owned())),
        Err(_) => Ok(None),
    }
}
