use crate::assets::fonts::FontFamily;
use crate::edit::input::{FontSizeInputPolicy, normalize_resized_font_size};
use crate::edit::overlay::{Mode, OverlayDefaults, TextOverlay};
use crate::edit::surface::{EditSurface, Viewport};
use crate::foundation::core::{HexColor, Point};
use crate::foundation::error::OvertextResult;

/// Display/Editing state machine for the single [`TextOverlay`].
///
/// Transitions never fail. Events that do not apply in the current mode (a drag while editing,
/// text input while displaying) are ignored and logged at debug level.
#[derive(Clone, Debug)]
pub struct OverlayController {
    overlay: TextOverlay,
    defaults: OverlayDefaults,
    input_policy: FontSizeInputPolicy,
    selected: bool,
}

impl OverlayController {
    /// Controller over a fresh overlay built from `defaults`.
    pub fn new(defaults: OverlayDefaults, input_policy: FontSizeInputPolicy) -> Self {
        Self {
            overlay: TextOverlay::from_defaults(&defaults),
            defaults,
            input_policy,
            selected: false,
        }
    }

    pub fn overlay(&self) -> &TextOverlay {
        &self.overlay
    }

    pub fn mode(&self) -> Mode {
        self.overlay.mode
    }

    /// Whether transform handles are attached to the text node.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn input_policy(&self) -> FontSizeInputPolicy {
        self.input_policy
    }

    /// Display -> Editing. Attaches handles first, then seeds the draft from the content.
    pub fn activate(&mut self) -> Mode {
        if self.overlay.mode == Mode::Editing {
            tracing::debug!("activate ignored: already editing");
            return self.overlay.mode;
        }
        self.selected = true;
        self.overlay.draft_content = self.overlay.content.clone();
        self.overlay.mode = Mode::Editing;
        tracing::debug!(draft = %self.overlay.draft_content, "display -> editing");
        self.overlay.mode
    }

    /// Replace the draft with the edit surface's current value.
    pub fn input(&mut self, text: impl Into<String>) {
        if self.overlay.mode != Mode::Editing {
            tracing::debug!("text input ignored outside editing");
            return;
        }
        self.overlay.draft_content = text.into();
    }

    /// Editing -> Display, committing the draft. Every blur commits; there is no discard path.
    pub fn blur(&mut self) -> Mode {
        if self.overlay.mode != Mode::Editing {
            tracing::debug!("blur ignored outside editing");
            return self.overlay.mode;
        }
        self.overlay.content = self.overlay.draft_content.clone();
        self.overlay.mode = Mode::Display;
        tracing::debug!(content = %self.overlay.content, "editing -> display (commit)");
        self.overlay.mode
    }

    /// Apply a drag-end position reported by the renderer.
    pub fn drag_end(&mut self, position: Point) {
        if self.overlay.mode != Mode::Display {
            tracing::debug!("drag ignored while editing");
            return;
        }
        if !(position.x.is_finite() && position.y.is_finite()) {
            tracing::warn!(?position, "non-finite drag position ignored");
            return;
        }
        self.overlay.position = position;
        tracing::debug!(x = position.x, y = position.y, "drag end");
    }

    /// Fold a finished resize gesture into the font size; the stored scale is always 1 after.
    pub fn resize_end(&mut self, scale_x: f64, position: Point) {
        if self.overlay.mode != Mode::Display {
            tracing::debug!("resize ignored while editing");
            return;
        }
        if !scale_x.is_finite() || scale_x <= 0.0 {
            tracing::warn!(scale_x, "invalid resize scale ignored");
            return;
        }
        let old = self.overlay.font_size_px;
        self.overlay.font_size_px = normalize_resized_font_size(old, scale_x);
        if position.x.is_finite() && position.y.is_finite() {
            self.overlay.position = position;
        }
        tracing::debug!(
            scale_x,
            old,
            new = self.overlay.font_size_px,
            "resize end"
        );
    }

    /// Typed value from the size control; applied as-is.
    pub fn set_font_size(&mut self, px: u32) {
        self.overlay.font_size_px = px;
    }

    /// Raw text from the size field, validated by the configured policy.
    ///
    /// On error the previous size is kept.
    pub fn set_font_size_input(&mut self, raw: &str) -> OvertextResult<u32> {
        match self.input_policy.apply(raw) {
            Ok(px) => {
                self.overlay.font_size_px = px;
                Ok(px)
            }
            Err(e) => {
                tracing::warn!(raw, error = %e, "font size input rejected");
                Err(e)
            }
        }
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.overlay.font_family = family;
    }

    pub fn set_fill_color(&mut self, color: HexColor) {
        self.overlay.fill_color = color;
    }

    pub fn set_stroke_color(&mut self, color: HexColor) {
        self.overlay.stroke_color = color;
    }

    /// Restore the session-start overlay.
    pub fn reset(&mut self) {
        self.overlay = TextOverlay::from_defaults(&self.defaults);
        self.selected = false;
        tracing::debug!("overlay reset to defaults");
    }

    /// Placement and styling for the external text input, while editing.
    pub fn edit_surface(&self, viewport: Viewport) -> Option<EditSurface> {
        (self.overlay.mode == Mode::Editing).then(|| EditSurface::for_overlay(&self.overlay, viewport))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/controller.rs"]
mod tests;
