use crate::assets::fonts::FontFamily;
use crate::edit::overlay::TextOverlay;
use crate::foundation::core::{HexColor, Point, Vec2};

/// Border width of the edit surface, in view pixels.
pub const EDIT_SURFACE_BORDER_PX: f64 = 1.0;
/// Inner padding of the edit surface, in view pixels.
pub const EDIT_SURFACE_PADDING_PX: f64 = 4.0;

/// Mapping from canvas space to the host's view space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// View-space position of the canvas origin.
    pub origin: Vec2,
    /// View pixels per canvas unit.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn to_view(self, p: Point) -> Point {
        Point::new(
            self.origin.x + p.x * self.zoom,
            self.origin.y + p.y * self.zoom,
        )
    }

    pub fn to_canvas(self, p: Point) -> Point {
        let zoom = if self.zoom.abs() > f64::EPSILON {
            self.zoom
        } else {
            1.0
        };
        Point::new((p.x - self.origin.x) / zoom, (p.y - self.origin.y) / zoom)
    }
}

/// Where and how the host should show the text input while editing.
///
/// Derived from the same overlay fields the canvas node uses, so the two cannot drift apart.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EditSurface {
    /// View-space left edge.
    pub left: f64,
    /// View-space top edge.
    pub top: f64,
    /// Font size in view pixels.
    pub font_size_px: f64,
    pub font_family: FontFamily,
    /// Text color (the overlay fill).
    pub color: HexColor,
    /// Border color (the overlay stroke).
    pub border_color: HexColor,
    pub border_width_px: f64,
    pub padding_px: f64,
    /// Current draft.
    pub value: String,
}

impl EditSurface {
    pub(crate) fn for_overlay(overlay: &TextOverlay, viewport: Viewport) -> Self {
        let anchor = viewport.to_view(overlay.position());
        Self {
            left: anchor.x,
            top: anchor.y,
            font_size_px: f64::from(overlay.font_size_px()) * viewport.zoom,
            font_family: overlay.font_family(),
            color: overlay.fill_color(),
            border_color: overlay.stroke_color(),
            border_width_px: EDIT_SURFACE_BORDER_PX,
            padding_px: EDIT_SURFACE_PADDING_PX,
            value: overlay.draft_content().to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/surface.rs"]
mod tests;
