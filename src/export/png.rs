use std::io::Cursor;

use crate::foundation::error::{OvertextError, OvertextResult};
use crate::render::backend::FrameRGBA;

/// Encode a frame as PNG. Premultiplied frames are converted back to straight alpha first.
pub fn encode_png(frame: &FrameRGBA) -> OvertextResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.width == 0 || frame.height == 0 {
        return Err(OvertextError::export("surface not ready: frame is empty"));
    }
    if frame.data.len() != expected {
        return Err(OvertextError::export(format!(
            "frame byte length mismatch: expected {expected}, got {}",
            frame.data.len()
        )));
    }

    let mut straight = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut straight);
    }

    let img = image::RgbaImage::from_raw(frame.width, frame.height, straight)
        .ok_or_else(|| OvertextError::export("frame buffer does not match its dimensions"))?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| OvertextError::export(format!("png encode failed: {e}")))?;
    Ok(out.into_inner())
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        match a {
            0 => {
                px[0] = 0;
                px[1] = 0;
                px[2] = 0;
            }
            255 => {}
            _ => {
                for c in &mut px[..3] {
                    *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
