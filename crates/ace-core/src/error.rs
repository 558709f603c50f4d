//! Error types for the session pipeline

use ace_curator::CurateError;

/// Main pipeline error type
///
/// A rolled-back curation batch is not an error: it is reported in the
/// session outcome and the pipeline carries on with the original document.
#[derive(Debug, thiserror::Error)]
pub enum AceError {
    /// Invalid or unparsable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Defect outside the atomic curation step
    #[error("curation failed: {0}")]
    Curate(#[from] CurateError),

    /// Session update payload could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AceError {
    /// Create a configuration error
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
