/// Convenience result type used across panelflow.
pub type PanelflowResult<T> = Result<T, PanelflowError>;

/// Top-level error taxonomy used by reader APIs.
///
/// Navigation commands never produce errors: out-of-range or concurrent requests are dropped.
/// Errors are reserved for content that cannot be laid out and for audio assets that the backend
/// cannot resolve.
#[derive(thiserror::Error, Debug)]
pub enum PanelflowError {
    /// Invalid caller-provided input (options, viewport, page extents).
    #[error("validation error: {0}")]
    Validation(String),

    /// Chapter content that cannot be laid out (degenerate geometry, zero-extent pages).
    #[error("content error: {0}")]
    Content(String),

    /// Audio asset creation or playback failures reported by a sound backend.
    #[error("audio error: {0}")]
    Audio(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanelflowError {
    /// Build a [`PanelflowError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PanelflowError::Content`] value.
    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    /// Build a [`PanelflowError::Audio`] value.
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Build a [`PanelflowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Prefix the message with location context, keeping the variant.
    pub(crate) fn within(self, context: impl std::fmt::Display) -> Self {
        match self {
            Self::Validation(m) => Self::Validation(format!("{context}: {m}")),
            Self::Content(m) => Self::Content(format!("{context}: {m}")),
            Self::Audio(m) => Self::Audio(format!("{context}: {m}")),
            Self::Serde(m) => Self::Serde(format!("{context}: {m}")),
            Self::Other(e) => Self::Other(e.context(context.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
