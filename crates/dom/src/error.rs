//! Error types for DOM operations.
//!
//! Simple, flat error hierarchy.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("invalid node type code: {0}")]
    InvalidNodeType(u8),

    #[error("malformed tree payload: {0}")]
    MalformedTree(String),

    #[error("unsupported selector: {0}")]
    InvalidSelector(String),

    #[error("maximum tree depth exceeded: {current} > {max}")]
    MaxDepthExceeded { current: usize, max: usize },

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
