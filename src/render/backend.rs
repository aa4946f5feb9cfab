use std::sync::Arc;

use crate::assets::fonts::FontRegistry;
use crate::foundation::error::OvertextResult;
use crate::render::scene::Scene;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** by default. The `premultiplied` flag is included to make
/// this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// A rasterizer for composed [`Scene`]s.
pub trait RenderBackend {
    /// Rasterize the whole frame.
    fn render_scene(&mut self, scene: &Scene) -> OvertextResult<FrameRGBA>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    Cpu,
}

/// Backend-agnostic settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderSettings {
    /// If set, backends clear the frame to this straight RGBA8 color before drawing.
    pub clear_rgba: Option<[u8; 4]>,
}

/// Create a rendering backend implementation.
pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
    fonts: Arc<FontRegistry>,
) -> OvertextResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
            fonts,
        ))),
    }
}
