/// Convenience result type used across walkmint APIs.
pub type WalkResult<T> = Result<T, WalkError>;

/// Top-level error type for walkmint operations.
///
/// Generation and rendering never fail; errors come from configuration, raster
/// export and video encoding.
#[derive(thiserror::Error, Debug)]
pub enum WalkError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Raster surface failure (surface sizing, readback).
    #[error("render error: {0}")]
    Render(String),

    /// Failure while writing PNG, metadata or video output.
    #[error("export error: {0}")]
    Export(String),

    /// Serialization/deserialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WalkError {
    /// Build a [`WalkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WalkError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`WalkError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`WalkError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for WalkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}
