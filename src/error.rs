//! # Error Module
//!
//! Errors surfaced by the planner. Queries against the grid never fail: an
//! out-of-range `block_at` or line walk simply sees Air. Only edits, layout
//! loading and configuration swaps report errors, and every one of them leaves
//! the live grid untouched when it does.

use thiserror::Error;

use crate::planner_state::reactor::block::block_type::BlockType;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// An edit targeted a position outside the reactor interior.
    #[error("position ({x}, {y}, {z}) is outside the reactor interior")]
    OutOfBounds { x: i32, y: i32, z: i32 },

    /// A persisted layout or requested dimension set is malformed.
    #[error("invalid layout: {message}")]
    Validation { message: String },

    /// A block refers to a display name the configuration does not know.
    #[error("configuration has no {block_type:?} entry named \"{name}\"")]
    Configuration { block_type: BlockType, name: String },

    /// The configuration itself is unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PlannerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        PlannerError::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        PlannerError::InvalidConfig {
            message: message.into(),
        }
    }
}
