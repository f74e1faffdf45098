//! Error types for the frame pipeline
//!
//! Only initialization and device failures are errors. Per-tick math and
//! command recording are infallible; misuse of the transform stack is logged
//! rather than returned.

use std::path::PathBuf;

/// Errors raised while loading named assets at startup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    /// No resource registered under this name
    #[error("asset not found: {0}")]
    NotFound(String),

    /// Resource exists but could not be turned into a model
    #[error("asset '{name}' is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// Errors reported by the rasterizer / display side
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// A frame was begun while the previous one was still attached
    #[error("render target already attached")]
    AlreadyAttached,

    /// A draw or present happened with no target attached
    #[error("no render target attached")]
    NotAttached,

    /// Draw referenced a model the device does not know
    #[error("unknown model handle {0}")]
    UnknownModel(u32),
}

/// Errors from loading the TOML configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Fatal errors of the frame pipeline
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Recording a command block ran past its capacity
    #[error("command block overflow: {len} commands exceeds limit of {limit}")]
    BlockOverflow { len: usize, limit: usize },

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
