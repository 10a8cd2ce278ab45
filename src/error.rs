//! Engine error types
//!
//! Only construction can fail. Everything after that is a silent no-op by
//! policy (unknown scene keys, double timer removal, double unsubscription).

use thiserror::Error;

/// Errors raised while building a [`crate::game::Game`]
#[derive(Debug, Error)]
pub enum EngineError {
    /// No browser window/document is available to mount into
    #[error("no host environment: the engine needs a window and a document")]
    NoHost,

    /// The configured mount element does not exist
    #[error("mount target `{0}` not found")]
    MountTargetMissing(String),

    /// The host could not provide a 2D drawing surface
    #[error("no display surface: {0}")]
    NoDisplaySurface(String),

    /// Output dimensions must be non-zero
    #[error("invalid output dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Two scenes were registered under the same key
    #[error("scene key `{0}` registered twice")]
    DuplicateScene(String),

    /// The configuration document could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether this error comes from the host environment rather than the config
    pub fn is_host_error(&self) -> bool {
        matches!(
            self,
            EngineError::NoHost | EngineError::MountTargetMissing(_) | EngineError::NoDisplaySurface(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
