//! Error and warning types for assembly compilation.

use serde::Serialize;
use shared::ParameterError;
use thiserror::Error;

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that abort a `build()` call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// Malformed or degenerate layer data.
    #[error("Configuration error at {path}: {message}")]
    Configuration {
        /// Layer path, e.g. `layers[2][0]`.
        path: String,
        message: String,
    },

    /// A dimension formula or parameter failed to evaluate.
    #[error("Parameter error at {path}: {source}")]
    Parameter {
        path: String,
        #[source]
        source: ParameterError,
    },
}

impl CompileError {
    pub fn configuration(path: impl Into<String>, message: impl Into<String>) -> Self {
        CompileError::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A texture failed to load; absorbed by material resolution.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Failed to load texture '{path}': {reason}")]
pub struct ResourceLoadError {
    pub path: String,
    pub reason: String,
}

/// Non-fatal problems recorded on the compiled scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompileWarning {
    /// Texture could not be loaded; solid color used instead.
    ResourceLoad { path: String, message: String },
    /// Element type tag not recognized; slot left empty.
    UnsupportedLayerType { path: String, tag: String },
    /// Frame elements produce no geometry yet.
    FrameNotImplemented { path: String },
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileWarning::ResourceLoad { path, message } => {
                write!(f, "{path}: {message}; using solid color")
            }
            CompileWarning::UnsupportedLayerType { path, tag } => {
                write!(f, "{path}: unsupported layer type '{tag}'")
            }
            CompileWarning::FrameNotImplemented { path } => {
                write!(f, "{path}: frame layers are not built yet")
            }
        }
    }
}
