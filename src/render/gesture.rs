use crate::edit::input::normalize_resized_font_size;
use crate::edit::overlay::{FONT_SIZE_MAX_PX, FONT_SIZE_MIN_PX};
use crate::foundation::core::{Point, Vec2};
use crate::render::scene::{Anchor, HitTarget, Scene};

/// Finished gesture, reported to the controller. The tracker never applies these itself.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GestureReport {
    /// Press and release on the text without movement.
    Activated,
    /// Text released after a drag.
    DragEnded { position: Point },
    /// Anchor released after a resize.
    ResizeEnded { scale_x: f64, position: Point },
}

/// In-flight gesture state the scene reflects live.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GesturePreview {
    #[default]
    None,
    Drag {
        offset: Vec2,
    },
    Resize {
        scale_x: f64,
        origin: Point,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum GestureState {
    #[default]
    Idle,
    Pressed {
        start: Point,
    },
    Dragging {
        start: Point,
        origin: Point,
        current: Point,
    },
    Resizing {
        anchor: Anchor,
        start_origin: Point,
        start_width: f64,
        base_width: f64,
        font_size_px: u32,
        scale_x: f64,
        x: f64,
    },
}

/// Keep `scale_x` inside the range the font-size control can represent for `font_size_px`.
fn clamp_scale(scale_x: f64, font_size_px: u32) -> f64 {
    let old = f64::from(font_size_px.max(1));
    scale_x.clamp(
        f64::from(FONT_SIZE_MIN_PX) / old,
        f64::from(FONT_SIZE_MAX_PX) / old,
    )
}

/// Left edge of a box of `width` whose fixed edge is set by `anchor`.
fn resized_x(anchor: Anchor, start_origin: Point, start_width: f64, width: f64) -> f64 {
    match anchor {
        Anchor::Right => start_origin.x,
        Anchor::Left => start_origin.x + start_width - width,
    }
}

/// Pointer down/move/up tracking for the text node: click, drag and horizontal resize.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    state: GestureState,
    pressed_origin: Point,
    drag_distance: f64,
    min_width: f64,
}

impl GestureTracker {
    /// `drag_distance`: movement beyond which a press becomes a drag.
    /// `min_width`: narrowest box a resize may produce.
    pub fn new(drag_distance: f64, min_width: f64) -> Self {
        Self {
            state: GestureState::Idle,
            pressed_origin: Point::ORIGIN,
            drag_distance: drag_distance.max(0.0),
            min_width: min_width.max(1.0),
        }
    }

    /// Whether a gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Start a gesture if `p` hits the text or an anchor of `scene`. Returns what was hit.
    pub fn pointer_down(&mut self, scene: &Scene, p: Point) -> Option<HitTarget> {
        let hit = scene.hit_test(p)?;
        let node = scene.text.as_ref()?;
        self.pressed_origin = node.origin;
        self.state = match hit {
            HitTarget::Text => GestureState::Pressed { start: p },
            HitTarget::Anchor(anchor) => {
                let base_width = node.size.width.max(1.0);
                GestureState::Resizing {
                    anchor,
                    start_origin: node.origin,
                    start_width: base_width * node.scale_x,
                    base_width,
                    font_size_px: node.font_size_px,
                    scale_x: node.scale_x,
                    x: node.origin.x,
                }
            }
        };
        tracing::debug!(?hit, x = p.x, y = p.y, "gesture start");
        Some(hit)
    }

    pub fn pointer_move(&mut self, p: Point) {
        self.state = match self.state {
            GestureState::Idle => GestureState::Idle,
            GestureState::Pressed { start } if (p - start).hypot() > self.drag_distance => {
                GestureState::Dragging {
                    start,
                    origin: self.pressed_origin,
                    current: p,
                }
            }
            pressed @ GestureState::Pressed { .. } => pressed,
            GestureState::Dragging { start, origin, .. } => GestureState::Dragging {
                start,
                origin,
                current: p,
            },
            GestureState::Resizing {
                anchor,
                start_origin,
                start_width,
                base_width,
                font_size_px,
                ..
            } => {
                let left = start_origin.x;
                let raw = match anchor {
                    Anchor::Right => p.x - left,
                    Anchor::Left => left + start_width - p.x,
                };
                // The font-size range wins over the minimum width.
                let scale_x = clamp_scale(raw.max(self.min_width) / base_width, font_size_px);
                GestureState::Resizing {
                    anchor,
                    start_origin,
                    start_width,
                    base_width,
                    font_size_px,
                    scale_x,
                    x: resized_x(anchor, start_origin, start_width, base_width * scale_x),
                }
            }
        };
    }

    /// Finish the gesture at `p` and report it.
    pub fn pointer_up(&mut self, p: Point) -> Option<GestureReport> {
        self.pointer_move(p);
        let report = match std::mem::take(&mut self.state) {
            GestureState::Idle => None,
            GestureState::Pressed { .. } => Some(GestureReport::Activated),
            GestureState::Dragging {
                start,
                origin,
                current,
            } => Some(GestureReport::DragEnded {
                position: origin + (current - start),
            }),
            GestureState::Resizing {
                anchor,
                start_origin,
                start_width,
                base_width,
                font_size_px,
                scale_x,
                ..
            } => {
                // Snap to the size the controller will apply so the fixed edge stays put.
                let old = font_size_px.max(1);
                let scale_x = f64::from(normalize_resized_font_size(old, scale_x)) / f64::from(old);
                let x = resized_x(anchor, start_origin, start_width, base_width * scale_x);
                Some(GestureReport::ResizeEnded {
                    scale_x,
                    position: Point::new(x, start_origin.y),
                })
            }
        };
        if let Some(r) = &report {
            tracing::debug!(report = ?r, "gesture end");
        }
        report
    }

    /// Abandon any gesture without reporting.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Live preview of the gesture in progress.
    pub fn preview(&self) -> GesturePreview {
        match self.state {
            GestureState::Idle | GestureState::Pressed { .. } => GesturePreview::None,
            GestureState::Dragging { start, current, .. } => GesturePreview::Drag {
                offset: current - start,
            },
            GestureState::Resizing {
                start_origin,
                scale_x,
                x,
                ..
            } => GesturePreview::Resize {
                scale_x,
                origin: Point::new(x, start_origin.y),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/gesture.rs"]
mod tests;
