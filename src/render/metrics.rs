use std::sync::Arc;

use crate::assets::fonts::{FontFamily, FontRegistry, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::Size;

/// Advance per character used by [`ApproxMetrics`], in em.
pub const APPROX_ADVANCE_EM: f64 = 0.6;
/// Line height used by [`ApproxMetrics`], in em.
pub const APPROX_LINE_HEIGHT_EM: f64 = 1.0;

/// Measures the unscaled box of a text node.
pub trait TextMetrics {
    /// Width and height of `text` set in `family` at `font_size_px`.
    fn measure(&mut self, text: &str, family: FontFamily, font_size_px: u32) -> Size;
}

/// Font-independent estimate: fixed advance per char, one line per `\n`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMetrics;

impl TextMetrics for ApproxMetrics {
    fn measure(&mut self, text: &str, _family: FontFamily, font_size_px: u32) -> Size {
        let size = f64::from(font_size_px);
        let widest = text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.split('\n').count().max(1);
        Size::new(
            widest as f64 * APPROX_ADVANCE_EM * size,
            lines as f64 * APPROX_LINE_HEIGHT_EM * size,
        )
    }
}

/// Parley-backed measurement with the same font the CPU backend draws with. Falls back to
/// [`ApproxMetrics`] when no font is registered at all.
pub struct LayoutMetrics {
    fonts: Arc<FontRegistry>,
    engine: TextLayoutEngine,
    fallback: ApproxMetrics,
}

impl LayoutMetrics {
    pub fn new(fonts: Arc<FontRegistry>) -> Self {
        Self {
            fonts,
            engine: TextLayoutEngine::new(),
            fallback: ApproxMetrics,
        }
    }
}

impl TextMetrics for LayoutMetrics {
    fn measure(&mut self, text: &str, family: FontFamily, font_size_px: u32) -> Size {
        let Some((resolved, bytes)) = self.fonts.resolve(family) else {
            return self.fallback.measure(text, family, font_size_px);
        };
        let bytes = Arc::clone(bytes);
        match self.engine.layout_plain(
            text,
            resolved,
            &bytes,
            font_size_px as f32,
            TextBrushRgba8::default(),
        ) {
            Ok(layout) => Size::new(f64::from(layout.width()), f64::from(layout.height())),
            Err(e) => {
                tracing::warn!(%family, error = %e, "text layout failed; using estimate");
                self.fallback.measure(text, family, font_size_px)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/metrics.rs"]
mod tests;
