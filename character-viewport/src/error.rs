use thiserror::Error;

/// Failures the viewport can surface.
///
/// `Mount` and `RenderContext` are fatal at mount time and keep the frame
/// loop from starting. `AssetLoad` and `Manifest` are reported to the status
/// overlay and the host page while the loop keeps running without characters.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViewportError {
    #[error("failed to load asset {path}: {reason}")]
    AssetLoad { path: String, reason: String },
    #[error("character manifest is invalid: {reason}")]
    Manifest { reason: String },
    #[error("no graphics context is available for rendering")]
    RenderContext,
    #[error("cannot mount viewport: {reason}")]
    Mount { reason: String },
}

impl ViewportError {
    pub fn asset_load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn manifest(reason: impl Into<String>) -> Self {
        Self::Manifest {
            reason: reason.into(),
        }
    }

    /// Fatal errors stop the mount; the rest are shown and tolerated.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RenderContext | Self::Mount { .. })
    }

    /// Stable identifier sent to the host page alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AssetLoad { .. } => "asset_load",
            Self::Manifest { .. } => "manifest",
            Self::RenderContext => "render_context",
            Self::Mount { .. } => "mount",
        }
    }
}
