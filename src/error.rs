//! Error types for PetalStudio

use crate::registry::ResourceClass;
use crate::scene::SceneObjectId;
use thiserror::Error;

/// Failure reported by an [`AudioEngine`](crate::engine::AudioEngine) call.
///
/// Wraps the engine's own result code together with a readable message so the
/// original diagnostic survives the trip through this layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("engine call failed with code {code}: {message}")]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Result type returned by engine calls.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PetalStudioError {
    #[error("Unknown {class} handle: {handle}")]
    UnknownHandle {
        class: ResourceClass,
        handle: String,
    },

    #[error("Duplicate {class} handle: {handle}")]
    DuplicateHandle {
        class: ResourceClass,
        handle: String,
    },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("No listener has been set")]
    ListenerNotSet,

    #[error("Scene object {0} is no longer valid")]
    InvalidSceneObject(SceneObjectId),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl PetalStudioError {
    /// Returns true for lookup misses, regardless of resource class.
    pub fn is_unknown_handle(&self) -> bool {
        matches!(self, Self::UnknownHandle { .. })
    }
}

pub type Result<T> = std::result::Result<T, PetalStudioError>;
