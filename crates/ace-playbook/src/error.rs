//! Error types for the playbook model

use crate::section::Section;

/// Playbook model errors
///
/// These indicate a broken document invariant, never an ordinary
/// "nothing to do" condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybookError {
    /// Section label is not one of the canonical names
    #[error("unknown section: {0:?}")]
    UnknownSection(String),

    /// Identifier already present somewhere in the document
    #[error("duplicate entry id '{id}' (already in {existing})")]
    DuplicateId {
        /// Conflicting identifier
        id: String,
        /// Section currently holding the identifier
        existing: Section,
    },

    /// Counter arithmetic would exceed the counter range
    #[error("counter overflow on entry '{id}'")]
    CounterOverflow {
        /// Entry whose counter overflowed
        id: String,
    },
}
