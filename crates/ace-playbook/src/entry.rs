//! Playbook entries
//!
//! An [`Entry`] is one guidance record with a document-wide unique id and
//! two monotonic utility counters.

use crate::error::PlaybookError;
use serde::{Deserialize, Serialize};

/// Single guidance record
///
/// Counters are unsigned, so non-negativity holds by construction.
/// `name` is accepted as an alias of `id` when reading older records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Document-wide unique identifier
    #[serde(alias = "name")]
    pub id: String,

    /// Guidance text
    pub text: String,

    /// Times the entry was rated helpful
    #[serde(default)]
    pub helpful: u64,

    /// Times the entry was rated harmful
    #[serde(default)]
    pub harmful: u64,
}

impl Entry {
    /// Create a fresh entry with zeroed counters
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            helpful: 0,
            harmful: 0,
        }
    }

    /// Create an entry with explicit counters
    #[inline]
    #[must_use]
    pub fn with_counts(
        id: impl Into<String>,
        text: impl Into<String>,
        helpful: u64,
        harmful: u64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            helpful,
            harmful,
        }
    }

    /// Add one to the helpful counter
    ///
    /// # Errors
    /// Returns [`PlaybookError::CounterOverflow`] if the counter is saturated
    pub fn mark_helpful(&mut self) -> Result<(), PlaybookError> {
        self.helpful = self
            .helpful
            .checked_add(1)
            .ok_or_else(|| PlaybookError::CounterOverflow { id: self.id.clone() })?;
        Ok(())
    }

    /// Add one to the harmful counter
    ///
    /// # Errors
    /// Returns [`PlaybookError::CounterOverflow`] if the counter is saturated
    pub fn mark_harmful(&mut self) -> Result<(), PlaybookError> {
        self.harmful = self
            .harmful
            .checked_add(1)
            .ok_or_else(|| PlaybookError::CounterOverflow { id: self.id.clone() })?;
        Ok(())
    }
}
