//! QR rendering for job tokens and QR detection in camera frames.
//!
//! Encoding produces a black-on-white PNG; decoding accepts any PNG or JPEG
//! frame and returns the first payload that decodes.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};

use crate::error::CoreError;

/// Pixels per QR module in rendered images.
pub const MODULE_PX: u32 = 6;

/// Light border around the symbol, in modules.
pub const QUIET_ZONE_MODULES: u32 = 2;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Render `payload` as a QR code and return the PNG bytes.
///
/// Fails with [`CoreError::Validation`] on an empty payload.
pub fn encode_png(payload: &str) -> Result<Vec<u8>, CoreError> {
    let image = render(payload)?;
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| CoreError::Internal(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Render `payload` as a greyscale QR image.
pub fn render(payload: &str) -> Result<GrayImage, CoreError> {
    if payload.is_empty() {
        return Err(CoreError::Validation("QR payload must not be empty".into()));
    }

    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| CoreError::Internal(format!("QR encoding failed: {e}")))?;
    let width = code.width() as u32;
    let colors = code.to_colors();
    let side = (width + 2 * QUIET_ZONE_MODULES) * MODULE_PX;

    Ok(GrayImage::from_fn(side, side, |x, y| {
        let mx = x / MODULE_PX;
        let my = y / MODULE_PX;
        let inside = (QUIET_ZONE_MODULES..width + QUIET_ZONE_MODULES).contains(&mx)
            && (QUIET_ZONE_MODULES..width + QUIET_ZONE_MODULES).contains(&my);
        if !inside {
            return LIGHT;
        }
        let idx = ((my - QUIET_ZONE_MODULES) * width + (mx - QUIET_ZONE_MODULES)) as usize;
        if colors[idx] == Color::Dark {
            DARK
        } else {
            LIGHT
        }
    }))
}

/// Decode the first QR payload found in an encoded camera frame.
///
/// Returns `Ok(None)` when the frame is a valid image without a decodable
/// code, and [`CoreError::Validation`] when the bytes are not an image.
pub fn decode_frame(frame: &[u8]) -> Result<Option<String>, CoreError> {
    let image = image::load_from_memory(frame)
        .map_err(|e| CoreError::Validation(format!("Unreadable camera frame: {e}")))?
        .to_luma8();
    Ok(decode_luma(&image))
}

/// Decode the first QR payload found in a greyscale image.
pub fn decode_luma(image: &GrayImage) -> Option<String> {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        image.width() as usize,
        image.height() as usize,
        |x, y| image.get_pixel(x as u32, y as u32).0[0],
    );

    prepared
        .detect_grids()
        .into_iter()
        .find_map(|grid| match grid.decode() {
            Ok((_, content)) => {
                let content = content.trim();
                (!content.is_empty()).then(|| content.to_string())
            }
            Err(e) => {
                tracing::debug!(error = ?e, "Skipping undecodable QR grid");
                None
            }
        })
}
