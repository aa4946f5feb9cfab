use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::foundation::error::{OvertextError, OvertextResult};

/// The fixed set of pre-registered overlay font families.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum FontFamily {
    /// `Cafe24Dangdanghae`
    Cafe24Dangdanghae,
    /// `Cafe24Ohsquare`
    Cafe24Ohsquare,
    /// `Cafe24Simplehae`
    Cafe24Simplehae,
    /// `NanumBarunGothic`
    #[default]
    NanumBarunGothic,
    /// `NanumBrush`
    NanumBrush,
    /// `NanumMyeongjoExtraBold`
    NanumMyeongjoExtraBold,
    /// `NanumSquareRoundEB`
    NanumSquareRoundEB,
}

impl FontFamily {
    /// Every family, in picker order.
    pub const ALL: [FontFamily; 7] = [
        FontFamily::Cafe24Dangdanghae,
        FontFamily::Cafe24Ohsquare,
        FontFamily::Cafe24Simplehae,
        FontFamily::NanumBarunGothic,
        FontFamily::NanumBrush,
        FontFamily::NanumMyeongjoExtraBold,
        FontFamily::NanumSquareRoundEB,
    ];

    /// Registered family name.
    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Cafe24Dangdanghae => "Cafe24Dangdanghae",
            FontFamily::Cafe24Ohsquare => "Cafe24Ohsquare",
            FontFamily::Cafe24Simplehae => "Cafe24Simplehae",
            FontFamily::NanumBarunGothic => "NanumBarunGothic",
            FontFamily::NanumBrush => "NanumBrush",
            FontFamily::NanumMyeongjoExtraBold => "NanumMyeongjoExtraBold",
            FontFamily::NanumSquareRoundEB => "NanumSquareRoundEB",
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontFamily {
    type Err = OvertextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontFamily::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| OvertextError::validation(format!("unknown font family \"{s}\"")))
    }
}

/// Font bytes per family. Families without a file on disk stay unregistered.
#[derive(Clone, Debug, Default)]
pub struct FontRegistry {
    fonts: HashMap<FontFamily, Arc<Vec<u8>>>,
}

impl FontRegistry {
    /// Registry with no fonts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every configured family from `dir`, skipping unreadable files.
    pub fn load(dir: &Path, files: &BTreeMap<FontFamily, std::path::PathBuf>) -> Self {
        let mut out = Self::empty();
        for (family, rel) in files {
            let path = dir.join(rel);
            match std::fs::read(&path) {
                Ok(bytes) => {
                    tracing::debug!(%family, path = %path.display(), "font registered");
                    out.insert(*family, bytes);
                }
                Err(e) => {
                    tracing::warn!(%family, path = %path.display(), error = %e, "font not available");
                }
            }
        }
        out
    }

    /// Register (or replace) the bytes for `family`.
    pub fn insert(&mut self, family: FontFamily, bytes: Vec<u8>) {
        self.fonts.insert(family, Arc::new(bytes));
    }

    /// Font bytes for `family`, if registered.
    pub fn get(&self, family: FontFamily) -> Option<&Arc<Vec<u8>>> {
        self.fonts.get(&family)
    }

    /// Font to draw `family` with: the family itself, else the default family, else the first
    /// registered family in picker order. `None` only when the registry is empty.
    pub fn resolve(&self, family: FontFamily) -> Option<(FontFamily, &Arc<Vec<u8>>)> {
        std::iter::once(family)
            .chain(std::iter::once(FontFamily::default()))
            .chain(FontFamily::ALL)
            .find_map(|f| self.fonts.get(&f).map(|bytes| (f, bytes)))
    }

    /// Whether `family` has a font.
    pub fn contains(&self, family: FontFamily) -> bool {
        self.fonts.contains_key(&family)
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// `true` when no family is registered.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Stateful helper for building Parley text layouts from registered font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_names: HashMap<FontFamily, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            family_names: HashMap::new(),
        }
    }

    /// Family name as reported by the font file, registering the bytes on first use.
    fn family_name(&mut self, family: FontFamily, font_bytes: &[u8]) -> OvertextResult<String> {
        if let Some(name) = self.family_names.get(&family) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            OvertextError::asset(format!("no font families registered for {family}"))
        })?;

        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| OvertextError::asset(format!("font for {family} has no family name")))?
            .to_string();
        self.family_names.insert(family, name.clone());
        Ok(name)
    }

    /// Shape and lay out plain text. Newlines start new lines; no wrapping.
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        family: FontFamily,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> OvertextResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(OvertextError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family_name = self.family_name(family, font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
