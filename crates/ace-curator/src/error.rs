//! Error types for the curator
//!
//! Only defects are errors. Malformed operations, dangling references and
//! unknown operation types are recorded as skips and never reach this type.

use ace_playbook::PlaybookError;

/// Unexpected failure while applying a batch
///
/// Any value of this type makes the atomic wrapper discard its working copy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurateError {
    /// Summing or incrementing counters left the counter range
    #[error("counter overflow on '{id}'")]
    CounterOverflow {
        /// Entry (or merge result) whose counter overflowed
        id: String,
    },

    /// A freshly generated id already exists elsewhere in the document
    #[error("generated id '{id}' collides with an existing entry")]
    IdCollision {
        /// Colliding identifier
        id: String,
    },

    /// Document model rejected a mutation
    #[error("playbook error: {0}")]
    Model(#[from] PlaybookError),

    /// Similarity scorer failed or returned a malformed score matrix
    #[error("similarity scoring failed: {0}")]
    Similarity(String),

    /// Failure raised by a custom engine
    #[error("engine failure: {0}")]
    Engine(String),
}

impl CurateError {
    /// Create an engine failure
    #[inline]
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine(message.into())
    }

    /// Create a similarity failure
    #[inline]
    pub fn similarity(message: impl Into<String>) -> Self {
        Self::Similarity(message.into())
    }
}
