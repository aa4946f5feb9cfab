use crate::assets::fonts::FontFamily;
use crate::foundation::core::{HexColor, Point};
use crate::foundation::error::{OvertextError, OvertextResult};

/// Smallest font size the size control offers.
pub const FONT_SIZE_MIN_PX: u32 = 10;
/// Largest font size the size control offers.
pub const FONT_SIZE_MAX_PX: u32 = 100;

/// Which surface currently shows the overlay text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Text is a canvas node (draggable, resizable).
    #[default]
    Display,
    /// Canvas node hidden; an external text input carries the draft.
    Editing,
}

/// Session-start state of the overlay, restored on reset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayDefaults {
    /// Initial content, also the placeholder shown whenever content is empty.
    pub content: String,
    /// Initial top-left anchor in canvas space.
    pub position: Point,
    /// Initial font size.
    pub font_size_px: u32,
    /// Initial font family.
    pub font_family: FontFamily,
    /// Initial fill color.
    pub fill_color: HexColor,
    /// Initial stroke color.
    pub stroke_color: HexColor,
}

impl Default for OverlayDefaults {
    fn default() -> Self {
        Self {
            content: "더블클릭하여 편집".to_owned(),
            position: Point::new(50.0, 50.0),
            font_size_px: 50,
            font_family: FontFamily::NanumBarunGothic,
            fill_color: HexColor::BLACK,
            stroke_color: HexColor::WHITE,
        }
    }
}

impl OverlayDefaults {
    /// Reject defaults that would break the never-empty render invariant.
    pub fn validate(&self) -> OvertextResult<()> {
        if self.content.is_empty() {
            return Err(OvertextError::validation(
                "default overlay content must be non-empty",
            ));
        }
        if !(self.position.x.is_finite() && self.position.y.is_finite()) {
            return Err(OvertextError::validation(
                "default overlay position must be finite",
            ));
        }
        if self.font_size_px == 0 {
            return Err(OvertextError::validation(
                "default font size must be > 0",
            ));
        }
        Ok(())
    }
}

/// The single text overlay of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOverlay {
    pub(crate) content: String,
    pub(crate) draft_content: String,
    pub(crate) position: Point,
    pub(crate) font_size_px: u32,
    pub(crate) font_family: FontFamily,
    pub(crate) fill_color: HexColor,
    pub(crate) stroke_color: HexColor,
    pub(crate) mode: Mode,
    placeholder: String,
}

impl TextOverlay {
    /// Fresh overlay in [`Mode::Display`] built from `defaults`.
    pub fn from_defaults(defaults: &OverlayDefaults) -> Self {
        Self {
            content: defaults.content.clone(),
            draft_content: defaults.content.clone(),
            position: defaults.position,
            font_size_px: defaults.font_size_px,
            font_family: defaults.font_family,
            fill_color: defaults.fill_color,
            stroke_color: defaults.stroke_color,
            mode: Mode::Display,
            placeholder: defaults.content.clone(),
        }
    }

    /// Committed text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// In-progress edit buffer; only meaningful while editing.
    pub fn draft_content(&self) -> &str {
        &self.draft_content
    }

    /// Text the canvas node shows: the content, or the placeholder when content is empty.
    pub fn display_text(&self) -> &str {
        if self.content.is_empty() {
            &self.placeholder
        } else {
            &self.content
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn font_size_px(&self) -> u32 {
        self.font_size_px
    }

    pub fn font_family(&self) -> FontFamily {
        self.font_family
    }

    pub fn fill_color(&self) -> HexColor {
        self.fill_color
    }

    pub fn stroke_color(&self) -> HexColor {
        self.stroke_color
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}
