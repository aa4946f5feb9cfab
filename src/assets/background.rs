use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::assets::PreparedImage;
use crate::assets::decode::load_image_file;
use crate::foundation::error::OvertextResult;

/// Observable state of the background layer.
#[derive(Clone, Debug, Default)]
pub enum BackgroundState {
    /// No background requested.
    #[default]
    Absent,
    /// A load is in flight; the layer is skipped until it resolves.
    Pending,
    /// Decoded and ready to draw.
    Loaded(Arc<PreparedImage>),
    /// The load failed; the layer stays empty for the rest of the session.
    Failed(String),
}

/// Background image handle, possibly still loading.
///
/// Decoding happens on a worker thread; the owner polls from its event loop, so the slot is only
/// ever mutated by one thread.
#[derive(Debug, Default)]
pub struct BackgroundSlot {
    state: BackgroundState,
    source: Option<PathBuf>,
    rx: Option<Receiver<OvertextResult<PreparedImage>>>,
}

impl BackgroundSlot {
    /// Slot with no background.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Slot that is already resolved.
    pub fn loaded(image: PreparedImage) -> Self {
        Self {
            state: BackgroundState::Loaded(Arc::new(image)),
            source: None,
            rx: None,
        }
    }

    /// Start decoding `path` in the background.
    pub fn spawn_load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        let spawned = std::thread::Builder::new()
            .name("overtext-background".to_owned())
            .spawn(move || {
                // Receiver may already be gone after a reset; nothing to report then.
                let _ = tx.send(load_image_file(&worker_path));
            });

        match spawned {
            Ok(_) => Self {
                state: BackgroundState::Pending,
                source: Some(path),
                rx: Some(rx),
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "background loader thread failed to start");
                Self {
                    state: BackgroundState::Failed(e.to_string()),
                    source: Some(path),
                    rx: None,
                }
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> &BackgroundState {
        &self.state
    }

    /// Path the slot was loaded from, if any.
    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    /// Loaded image, or `None` while absent, pending or failed.
    pub fn image(&self) -> Option<&Arc<PreparedImage>> {
        match &self.state {
            BackgroundState::Loaded(img) => Some(img),
            _ => None,
        }
    }

    /// Non-blocking check for a finished load. Returns `true` when the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.rx.as_ref() else {
            return false;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.resolve(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.resolve_failed("background loader exited without a result".to_owned());
                true
            }
        }
    }

    /// Block until a pending load resolves. No-op for other states.
    pub fn wait(&mut self) -> &BackgroundState {
        if let Some(rx) = self.rx.as_ref() {
            match rx.recv() {
                Ok(result) => self.resolve(result),
                Err(_) => {
                    self.resolve_failed("background loader exited without a result".to_owned())
                }
            }
        }
        &self.state
    }

    fn resolve(&mut self, result: OvertextResult<PreparedImage>) {
        self.rx = None;
        match result {
            Ok(img) => {
                tracing::info!(width = img.width, height = img.height, "background loaded");
                self.state = BackgroundState::Loaded(Arc::new(img));
            }
            Err(e) => self.resolve_failed(e.to_string()),
        }
    }

    fn resolve_failed(&mut self, msg: String) {
        tracing::warn!(error = %msg, "background load failed; layer skipped");
        self.rx = None;
        self.state = BackgroundState::Failed(msg);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
