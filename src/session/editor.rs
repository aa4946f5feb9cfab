use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::PreparedImage;
use crate::assets::background::{BackgroundSlot, BackgroundState};
use crate::assets::fonts::FontRegistry;
use crate::edit::controller::OverlayController;
use crate::edit::overlay::{Mode, TextOverlay};
use crate::edit::surface::{EditSurface, Viewport};
use crate::export::export_scene;
use crate::export::sink::ExportSink;
use crate::foundation::core::Point;
use crate::foundation::error::OvertextResult;
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::gesture::{GestureReport, GestureTracker};
use crate::render::metrics::{LayoutMetrics, TextMetrics};
use crate::render::scene::{ComposeInput, HitTarget, Scene, SceneStyle, compose};
use crate::session::config::EditorConfig;
use crate::session::events::EditorEvent;

/// Output side of a session: where frames are rasterized and exports are saved.
pub struct SessionIo<'a> {
    pub backend: &'a mut dyn RenderBackend,
    pub sink: &'a mut dyn ExportSink,
}

/// One editing session over a single overlay and background.
///
/// The session is the only writer of overlay state. Hosts feed it [`EditorEvent`]s through
/// [`EditorSession::dispatch`] and read frames back through [`EditorSession::scene`].
pub struct EditorSession {
    config: EditorConfig,
    style: SceneStyle,
    controller: OverlayController,
    gestures: GestureTracker,
    background: BackgroundSlot,
    fonts: Arc<FontRegistry>,
    metrics: Box<dyn TextMetrics>,
    viewport: Viewport,
}

impl EditorSession {
    /// Validate `config` and load its fonts. The background is not requested yet; see
    /// [`EditorSession::load_background`].
    pub fn new(config: EditorConfig) -> OvertextResult<Self> {
        config.validate()?;
        let fonts = config.load_fonts();
        Ok(Self::with_fonts(config, fonts))
    }

    /// Session over an already-built font registry. `config` is assumed valid.
    pub fn with_fonts(config: EditorConfig, fonts: FontRegistry) -> Self {
        let fonts = Arc::new(fonts);
        tracing::debug!(fonts = fonts.len(), "editor session created");
        Self {
            style: config.scene_style(),
            controller: OverlayController::new(config.defaults.clone(), config.font_size_input),
            gestures: GestureTracker::new(config.drag_distance, config.min_resize_width),
            background: BackgroundSlot::empty(),
            metrics: Box::new(LayoutMetrics::new(Arc::clone(&fonts))),
            fonts,
            viewport: Viewport::default(),
            config,
        }
    }

    /// Replace the text measurement used for node boxes and hit testing.
    pub fn with_metrics(mut self, metrics: impl TextMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn controller(&self) -> &OverlayController {
        &self.controller
    }

    pub fn overlay(&self) -> &TextOverlay {
        self.controller.overlay()
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    /// Registered fonts, shared with the backend that rasterizes this session.
    pub fn fonts(&self) -> &Arc<FontRegistry> {
        &self.fonts
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Set where the canvas sits in the host view. Pointer events are mapped through it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Start loading the configured background on a worker thread.
    pub fn load_background(&mut self) {
        let path = self.config.background_path.clone();
        self.load_background_from(path);
    }

    /// Start loading `path` as the background, replacing the current one.
    pub fn load_background_from(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::debug!(path = %path.display(), "background load requested");
        self.background = BackgroundSlot::spawn_load(path);
    }

    /// Use an already-decoded background.
    pub fn set_background_image(&mut self, image: PreparedImage) {
        self.background = BackgroundSlot::loaded(image);
    }

    pub fn background(&self) -> &BackgroundSlot {
        &self.background
    }

    /// Pick up a finished background load, if any. Returns `true` when the frame changed.
    pub fn poll_background(&mut self) -> bool {
        self.background.poll()
    }

    /// Block until the background resolves.
    pub fn wait_background(&mut self) -> &BackgroundState {
        self.background.wait()
    }

    /// The current frame, in-flight gesture included.
    pub fn scene(&mut self) -> Scene {
        compose(
            &self.style,
            ComposeInput {
                overlay: self.controller.overlay(),
                selected: self.controller.is_selected(),
                background: self.background.image(),
                preview: self.gestures.preview(),
            },
            self.metrics.as_mut(),
        )
    }

    /// The frame an export captures.
    pub fn export_frame_scene(&mut self) -> Scene {
        let scene = self.scene();
        if self.config.export_includes_handles {
            scene
        } else {
            scene.without_handles()
        }
    }

    /// Rasterize the current frame.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> OvertextResult<FrameRGBA> {
        let scene = self.scene();
        backend.render_scene(&scene)
    }

    /// Placement of the external text input while editing.
    pub fn edit_surface(&self) -> Option<EditSurface> {
        self.controller.edit_surface(self.viewport)
    }

    /// Single entry point for host events.
    ///
    /// Errors leave the overlay unchanged. Only raw font-size input and export can fail.
    pub fn dispatch(&mut self, event: EditorEvent, io: &mut SessionIo<'_>) -> OvertextResult<()> {
        tracing::trace!(?event, "dispatch");
        match event {
            EditorEvent::PointerDown { x, y } => {
                self.pointer_down(Point::new(x, y));
            }
            EditorEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            EditorEvent::PointerUp { x, y } => {
                self.pointer_up(Point::new(x, y));
            }
            EditorEvent::Click => {
                self.controller.activate();
            }
            EditorEvent::Drag { x, y } => self.controller.drag_end(Point::new(x, y)),
            EditorEvent::Resize { scale_x } => {
                let position = self.controller.overlay().position();
                self.controller.resize_end(scale_x, position);
            }
            EditorEvent::Input { text } => self.controller.input(text),
            EditorEvent::Blur => {
                self.controller.blur();
            }
            EditorEvent::SetFontSize { px } => self.controller.set_font_size(px),
            EditorEvent::FontSizeInput { raw } => {
                self.controller.set_font_size_input(&raw)?;
            }
            EditorEvent::SetFontFamily { family } => self.controller.set_font_family(family),
            EditorEvent::SetFillColor { color } => self.controller.set_fill_color(color),
            EditorEvent::SetStrokeColor { color } => self.controller.set_stroke_color(color),
            EditorEvent::Export => self.export(&mut *io.backend, &mut *io.sink)?,
            EditorEvent::Reset => self.reset(),
        }
        Ok(())
    }

    /// Pointer pressed at view-space `p`.
    ///
    /// While editing, a press on the canvas takes focus from the edit surface: the draft is
    /// committed and no gesture starts.
    pub fn pointer_down(&mut self, p: Point) -> Option<HitTarget> {
        if self.controller.mode() == Mode::Editing {
            self.controller.blur();
            return None;
        }
        let p = self.viewport.to_canvas(p);
        let scene = self.scene();
        self.gestures.pointer_down(&scene, p)
    }

    pub fn pointer_move(&mut self, p: Point) {
        let p = self.viewport.to_canvas(p);
        self.gestures.pointer_move(p);
    }

    /// Pointer released; the finished gesture is applied to the overlay.
    pub fn pointer_up(&mut self, p: Point) -> Option<GestureReport> {
        let p = self.viewport.to_canvas(p);
        let report = self.gestures.pointer_up(p)?;
        match report {
            GestureReport::Activated => {
                self.controller.activate();
            }
            GestureReport::DragEnded { position } => self.controller.drag_end(position),
            GestureReport::ResizeEnded { scale_x, position } => {
                self.controller.resize_end(scale_x, position)
            }
        }
        Some(report)
    }

    /// Rasterize the export frame and save it under the configured filename.
    pub fn export(
        &mut self,
        backend: &mut dyn RenderBackend,
        sink: &mut dyn ExportSink,
    ) -> OvertextResult<()> {
        self.poll_background();
        if matches!(self.background.state(), BackgroundState::Pending) {
            tracing::warn!("exporting while the background is still loading; layer omitted");
        }
        if self.controller.mode() == Mode::Editing {
            tracing::debug!("exporting while editing; text node is hidden");
        }
        let scene = self.export_frame_scene();
        let filename = self.config.export_filename.clone();
        export_scene(&scene, backend, sink, &filename)
    }

    /// Back to session start: default overlay, no gesture, background discarded and requested
    /// again from its original source.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.gestures.cancel();
        let source = self.background.source().cloned();
        self.background = BackgroundSlot::empty();
        if let Some(path) = source {
            self.load_background_from(path);
        }
        tracing::info!("session reset");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
