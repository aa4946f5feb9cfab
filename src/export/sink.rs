use std::path::{Path, PathBuf};

use crate::foundation::error::{OvertextError, OvertextResult};

/// Destination for exported files.
pub trait ExportSink {
    /// Store `bytes` under `filename`, replacing any previous file of that name.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> OvertextResult<()>;
}

/// Writes exports into a directory, creating it on first save.
#[derive(Clone, Debug)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirSink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> OvertextResult<()> {
        validate_filename(filename)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            OvertextError::export(format!("create output dir '{}': {e}", self.dir.display()))
        })?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)
            .map_err(|e| OvertextError::export(format!("write '{}': {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "export written");
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// Saved files in call order.
    pub(crate) files: Vec<(String, Vec<u8>)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the saved files.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    /// Most recent save, if any.
    pub fn last(&self) -> Option<&(String, Vec<u8>)> {
        self.files.last()
    }
}

impl ExportSink for InMemorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> OvertextResult<()> {
        validate_filename(filename)?;
        self.files.push((filename.to_owned(), bytes.to_vec()));
        Ok(())
    }
}

/// Export names are plain file names; directories come from the sink.
fn validate_filename(filename: &str) -> OvertextResult<()> {
    if filename.trim().is_empty() {
        return Err(OvertextError::export("export filename must be non-empty"));
    }
    if filename.contains(['/', '\\']) || filename == "." || filename == ".." {
        return Err(OvertextError::export(format!(
            "export filename '{filename}' must not contain path components"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
