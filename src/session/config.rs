use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::fonts::{FontFamily, FontRegistry};
use crate::edit::input::FontSizeInputPolicy;
use crate::edit::overlay::OverlayDefaults;
use crate::export::DEFAULT_EXPORT_FILENAME;
use crate::foundation::core::{Canvas, Size};
use crate::foundation::error::{OvertextError, OvertextResult};
use crate::render::backend::RenderSettings;
use crate::render::scene::SceneStyle;

/// Editor configuration, usually read from JSON. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Logical canvas resolution; also the exported image size.
    pub canvas: Canvas,
    /// Background image loaded at session start.
    pub background_path: PathBuf,
    /// Box the background is scaled into, anchored at the canvas origin.
    pub background_size: Size,
    /// Overlay state at session start and after a reset.
    pub defaults: OverlayDefaults,
    pub stroke_width: f64,
    /// Narrowest box a resize gesture may produce.
    pub min_resize_width: f64,
    pub handle_size: f64,
    /// Pointer travel before a press turns into a drag.
    pub drag_distance: f64,
    pub export_filename: String,
    pub font_size_input: FontSizeInputPolicy,
    /// Font file per family, relative to `fonts_dir`.
    pub fonts: BTreeMap<FontFamily, PathBuf>,
    pub fonts_dir: PathBuf,
    /// Straight RGBA8 color behind the background; `None` leaves it transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Whether exports show the transform handles when they are attached.
    pub export_includes_handles: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            background_path: PathBuf::from("original.jpg"),
            background_size: Size::new(800.0, 800.0),
            defaults: OverlayDefaults::default(),
            stroke_width: 1.0,
            min_resize_width: 30.0,
            handle_size: 10.0,
            drag_distance: 0.0,
            export_filename: DEFAULT_EXPORT_FILENAME.to_owned(),
            font_size_input: FontSizeInputPolicy::default(),
            fonts: FontFamily::ALL
                .iter()
                .map(|f| (*f, PathBuf::from(format!("{}.ttf", f.name()))))
                .collect(),
            fonts_dir: PathBuf::from("fonts"),
            clear_rgba: None,
            export_includes_handles: true,
        }
    }
}

impl EditorConfig {
    /// Parse a config from a JSON reader. Paths are kept as written.
    pub fn from_reader<R: std::io::Read>(r: R) -> OvertextResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| OvertextError::serde(format!("parse editor config JSON: {e}")))
    }

    /// Parse a config file. Relative paths inside it resolve against the file's directory.
    pub fn from_json_path(path: impl AsRef<Path>) -> OvertextResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            OvertextError::validation(format!("open editor config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if let Some(base) = path.parent() {
            cfg.rebase(base);
        }
        Ok(cfg)
    }

    /// Resolve relative asset paths against `base`.
    pub fn rebase(&mut self, base: &Path) {
        if self.background_path.is_relative() {
            self.background_path = base.join(&self.background_path);
        }
        if self.fonts_dir.is_relative() {
            self.fonts_dir = base.join(&self.fonts_dir);
        }
    }

    pub fn validate(&self) -> OvertextResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(OvertextError::validation("canvas dimensions must be > 0"));
        }
        let bg = self.background_size;
        if !(bg.width.is_finite() && bg.height.is_finite()) || bg.width < 0.0 || bg.height < 0.0 {
            return Err(OvertextError::validation(
                "background_size must be finite and >= 0",
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(OvertextError::validation(
                "stroke_width must be finite and >= 0",
            ));
        }
        if !self.min_resize_width.is_finite() || self.min_resize_width <= 0.0 {
            return Err(OvertextError::validation(
                "min_resize_width must be finite and > 0",
            ));
        }
        if !self.handle_size.is_finite() || self.handle_size <= 0.0 {
            return Err(OvertextError::validation(
                "handle_size must be finite and > 0",
            ));
        }
        if !self.drag_distance.is_finite() || self.drag_distance < 0.0 {
            return Err(OvertextError::validation(
                "drag_distance must be finite and >= 0",
            ));
        }
        if self.export_filename.trim().is_empty() {
            return Err(OvertextError::validation(
                "export_filename must be non-empty",
            ));
        }
        self.defaults.validate()
    }

    /// Composition parameters derived from this config.
    pub fn scene_style(&self) -> SceneStyle {
        SceneStyle {
            canvas: self.canvas,
            background_size: self.background_size,
            stroke_width: self.stroke_width,
            handle_size: self.handle_size,
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            clear_rgba: self.clear_rgba,
        }
    }

    /// Read every configured font from `fonts_dir`. Missing files leave their family
    /// unregistered.
    pub fn load_fonts(&self) -> FontRegistry {
        FontRegistry::load(&self.fonts_dir, &self.fonts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
