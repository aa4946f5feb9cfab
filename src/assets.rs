//! Background image and font assets consumed by the renderer.

use std::sync::Arc;

pub(crate) mod background;
pub(crate) mod decode;
pub(crate) mod fonts;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}
