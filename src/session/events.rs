use crate::assets::fonts::FontFamily;
use crate::foundation::core::HexColor;
use crate::foundation::error::{OvertextError, OvertextResult};

/// Everything the host can tell a session. Pointer coordinates are in view space.
///
/// Serialized with an internal `type` tag, e.g. `{"type": "pointer_down", "x": 60, "y": 70}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    PointerDown {
        x: f64,
        y: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    /// Activation of the text node without a pointer sequence.
    Click,
    /// A finished drag, in canvas space.
    Drag {
        x: f64,
        y: f64,
    },
    /// A finished resize by `scale_x`; the position is kept.
    Resize {
        scale_x: f64,
    },
    /// New value of the edit surface.
    Input {
        text: String,
    },
    /// The edit surface lost focus.
    Blur,
    SetFontSize {
        px: u32,
    },
    /// Raw text of the size field.
    FontSizeInput {
        raw: String,
    },
    SetFontFamily {
        family: FontFamily,
    },
    SetFillColor {
        color: HexColor,
    },
    SetStrokeColor {
        color: HexColor,
    },
    Export,
    Reset,
}

/// Parse a JSON array of events.
pub fn parse_script(json: &str) -> OvertextResult<Vec<EditorEvent>> {
    serde_json::from_str(json)
        .map_err(|e| OvertextError::serde(format!("parse event script JSON: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/events.rs"]
mod tests;
