/// Crate-wide result alias.
pub type OvertextResult<T> = Result<T, OvertextError>;

/// Errors surfaced by the overlay editor.
///
/// State transitions themselves never fail; errors come from edge validation (raw input,
/// config), asset loading, rasterization and export.
#[derive(thiserror::Error, Debug)]
pub enum OvertextError {
    /// Rejected input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Background image or font could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Scene could not be rasterized.
    #[error("render error: {0}")]
    Render(String),

    /// Frame could not be encoded or saved.
    #[error("export error: {0}")]
    Export(String),

    /// Config or event script could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OvertextError {
    /// Build a [`OvertextError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`OvertextError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`OvertextError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`OvertextError::Export`].
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`OvertextError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
