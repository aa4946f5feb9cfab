use std::sync::Arc;

use crate::assets::PreparedImage;
use crate::assets::fonts::FontFamily;
use crate::edit::overlay::{Mode, TextOverlay};
use crate::foundation::core::{Affine, Canvas, HexColor, Point, Rect, Size};
use crate::render::gesture::GesturePreview;
use crate::render::metrics::TextMetrics;

/// Fixed, config-derived parameters of scene composition.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneStyle {
    /// Logical canvas size.
    pub canvas: Canvas,
    /// Box the background is scaled into, anchored at the canvas origin.
    pub background_size: Size,
    /// Outline width of the text glyphs.
    pub stroke_width: f64,
    /// Side length of the square resize anchors.
    pub handle_size: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            background_size: Size::new(800.0, 800.0),
            stroke_width: 1.0,
            handle_size: 10.0,
        }
    }
}

/// Background image placed on the canvas.
#[derive(Clone, Debug)]
pub struct BackgroundLayer {
    pub image: Arc<PreparedImage>,
    /// Destination rectangle in canvas space.
    pub dest: Rect,
}

/// The overlay as a canvas node.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    /// Text to draw; never empty.
    pub text: String,
    /// Top-left anchor.
    pub origin: Point,
    pub font_size_px: u32,
    pub font_family: FontFamily,
    pub fill: HexColor,
    pub stroke: HexColor,
    pub stroke_width: f64,
    /// Horizontal scale; differs from 1 only during a resize gesture.
    pub scale_x: f64,
    /// Unscaled measured box.
    pub size: Size,
}

impl TextNode {
    /// Canvas-space box, scale included.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(
            self.origin,
            Size::new(self.size.width * self.scale_x, self.size.height),
        )
    }

    /// Local-to-canvas transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale_non_uniform(self.scale_x, 1.0)
    }
}

/// Which horizontal resize anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Middle of the left edge.
    Left,
    /// Middle of the right edge.
    Right,
}

/// Transform handles attached to the text node. Only the middle-left and middle-right anchors
/// exist.
#[derive(Clone, Debug, PartialEq)]
pub struct Handles {
    pub border: Rect,
    pub left: Rect,
    pub right: Rect,
}

impl Handles {
    fn around(bounds: Rect, anchor_size: f64) -> Self {
        let mid_y = (bounds.y0 + bounds.y1) * 0.5;
        let anchor = Size::new(anchor_size, anchor_size);
        Self {
            border: bounds,
            left: Rect::from_center_size(Point::new(bounds.x0, mid_y), anchor),
            right: Rect::from_center_size(Point::new(bounds.x1, mid_y), anchor),
        }
    }

    /// Rectangle of one anchor.
    pub fn anchor_rect(&self, anchor: Anchor) -> Rect {
        match anchor {
            Anchor::Left => self.left,
            Anchor::Right => self.right,
        }
    }
}

/// What a pointer position lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Text,
    Anchor(Anchor),
}

/// One composited frame as a display list. Regenerated from scratch on every change.
#[derive(Clone, Debug)]
pub struct Scene {
    pub canvas: Canvas,
    pub background: Option<BackgroundLayer>,
    pub text: Option<TextNode>,
    pub handles: Option<Handles>,
}

impl Scene {
    /// Topmost target under `p`. Anchors win over the text body.
    pub fn hit_test(&self, p: Point) -> Option<HitTarget> {
        if let Some(h) = &self.handles {
            for anchor in [Anchor::Left, Anchor::Right] {
                if h.anchor_rect(anchor).contains(p) {
                    return Some(HitTarget::Anchor(anchor));
                }
            }
        }
        match &self.text {
            Some(t) if t.bounds().contains(p) => Some(HitTarget::Text),
            _ => None,
        }
    }

    /// Same frame with the transform handles dropped.
    pub fn without_handles(mut self) -> Self {
        self.handles = None;
        self
    }
}

/// Per-frame inputs to [`compose`].
#[derive(Clone, Copy, Debug)]
pub struct ComposeInput<'a> {
    pub overlay: &'a TextOverlay,
    /// Whether handles are attached.
    pub selected: bool,
    /// Loaded background, `None` while absent or still loading.
    pub background: Option<&'a Arc<PreparedImage>>,
    /// In-flight gesture to show.
    pub preview: GesturePreview,
}

/// Build the frame for the current state. Pure apart from text measurement.
///
/// While editing, the text node and its handles are omitted: the external edit surface shows the
/// text instead.
#[tracing::instrument(level = "trace", skip_all, fields(mode = ?input.overlay.mode()))]
pub fn compose(style: &SceneStyle, input: ComposeInput<'_>, metrics: &mut dyn TextMetrics) -> Scene {
    let background = input.background.map(|image| BackgroundLayer {
        image: Arc::clone(image),
        dest: Rect::from_origin_size(Point::ORIGIN, style.background_size),
    });

    let overlay = input.overlay;
    let text = (overlay.mode() == Mode::Display).then(|| {
        let text = overlay.display_text().to_owned();
        let size = metrics.measure(&text, overlay.font_family(), overlay.font_size_px());
        let (origin, scale_x) = match input.preview {
            GesturePreview::None => (overlay.position(), 1.0),
            GesturePreview::Drag { offset } => (overlay.position() + offset, 1.0),
            GesturePreview::Resize { scale_x, origin } => (origin, scale_x),
        };
        TextNode {
            text,
            origin,
            font_size_px: overlay.font_size_px(),
            font_family: overlay.font_family(),
            fill: overlay.fill_color(),
            stroke: overlay.stroke_color(),
            stroke_width: style.stroke_width,
            scale_x,
            size,
        }
    });

    let handles = match &text {
        Some(node) if input.selected => Some(Handles::around(node.bounds(), style.handle_size)),
        _ => None,
    };

    Scene {
        canvas: style.canvas,
        background,
        text,
        handles,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
