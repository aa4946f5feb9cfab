//! PNG export of composited frames.
//!
//! Export reads the rendered frame, never the overlay state: whatever the renderer shows is what
//! gets saved.

pub(crate) mod png;
pub(crate) mod sink;

use crate::foundation::error::OvertextResult;
use crate::render::backend::RenderBackend;
use crate::render::scene::Scene;

/// Default name of the exported file.
pub const DEFAULT_EXPORT_FILENAME: &str = "edited-image.png";

/// Rasterize `scene`, encode it as PNG and hand it to `sink` under `filename`.
#[tracing::instrument(level = "debug", skip(scene, backend, sink))]
pub fn export_scene(
    scene: &Scene,
    backend: &mut dyn RenderBackend,
    sink: &mut dyn sink::ExportSink,
    filename: &str,
) -> OvertextResult<()> {
    let frame = backend.render_scene(scene)?;
    let bytes = png::encode_png(&frame)?;
    sink.save(filename, &bytes)?;
    tracing::info!(
        filename,
        width = frame.width,
        height = frame.height,
        bytes = bytes.len(),
        "exported frame"
    );
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
