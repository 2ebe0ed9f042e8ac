//! Error types shared across the crate

use crate::config::ConfigError;

/// Errors surfaced while building or rendering a scene
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// A shape or material descriptor carried parameters that cannot produce
    /// a valid object (negative radius, degenerate polygon, ...)
    #[error("invalid {descriptor} parameters: {reason}")]
    InvalidGeometryParameters {
        descriptor: &'static str,
        reason: String,
    },

    /// The host could not provide a drawing surface, adapter or device
    #[error("renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// The surface was lost or outdated for this frame and has been reconfigured
    #[error("surface lost, reconfigured for next frame")]
    SurfaceLost,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
}

impl SceneError {
    pub(crate) fn invalid(descriptor: &'static str, reason: impl Into<String>) -> Self {
        SceneError::InvalidGeometryParameters {
            descriptor,
            reason: reason.into(),
        }
    }

    /// Whether the render loop can keep scheduling frames after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SceneError::SurfaceLost)
    }
}

pub type Result<T> = std::result::Result<T, SceneError>;
