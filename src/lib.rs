//! Overtext places one editable text label on a background image and exports the composite as
//! a PNG.
//!
//! The crate is organised around a single-writer session:
//!
//! - Build an [`EditorSession`] from an [`EditorConfig`]
//! - Feed it [`EditorEvent`]s (pointer gestures, text input, style changes)
//! - Compose the current [`Scene`] and rasterize it with a [`RenderBackend`], or export it
//!   through an [`ExportSink`]
#![forbid(unsafe_code)]

mod assets;
mod edit;
mod export;
mod foundation;
mod render;
mod session;

pub use crate::foundation::core::{
    Affine, Canvas, HexColor, Point, Rect, Size, Vec2,
};
pub use crate::foundation::error::{OvertextError, OvertextResult};

pub use crate::assets::PreparedImage;
pub use crate::assets::background::{BackgroundSlot, BackgroundState};
pub use crate::assets::decode::{decode_image, load_image_file};
pub use crate::assets::fonts::{FontFamily, FontRegistry};

pub use crate::edit::controller::OverlayController;
pub use crate::edit::input::FontSizeInputPolicy;
pub use crate::edit::overlay::{
    FONT_SIZE_MAX_PX, FONT_SIZE_MIN_PX, Mode, OverlayDefaults, TextOverlay,
};
pub use crate::edit::surface::{EditSurface, Viewport};

pub use crate::render::backend::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::gesture::{GesturePreview, GestureReport, GestureTracker};
pub use crate::render::metrics::{ApproxMetrics, LayoutMetrics, TextMetrics};
pub use crate::render::scene::{
    Anchor, BackgroundLayer, ComposeInput, Handles, HitTarget, Scene, SceneStyle, TextNode,
    compose,
};

pub use crate::export::png::encode_png;
pub use crate::export::sink::{DirSink, ExportSink, InMemorySink};
pub use crate::export::{DEFAULT_EXPORT_FILENAME, export_scene};

pub use crate::session::config::EditorConfig;
pub use crate::session::editor::{EditorSession, SessionIo};
pub use crate::session::events::{EditorEvent, parse_script};
