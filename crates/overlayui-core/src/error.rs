//! Error types for canvas operations.

use crate::node::NodeId;
use thiserror::Error;

/// Errors raised by canvas, node and control operations.
///
/// None of these are fatal: the frame loop logs them and carries on.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    #[error("node {0:?} cannot hold children")]
    NotAContainer(NodeId),
    #[error("only widgets can be placed directly on the canvas")]
    NotAWidget,
    #[error("node {0:?} does not have the {1} capability")]
    MissingCapability(NodeId, &'static str),
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown style property: {0}")]
    UnknownProperty(String),
    #[error("invalid value {value:?} for property {property}")]
    InvalidValue { property: String, value: String },
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for canvas operations.
pub type UiResult<T> = Result<T, UiError>;
