//! Capped operation batches

use crate::config::DEFAULT_MAX_OPERATIONS;
use crate::operation::Operation;
use serde::Serialize;
use serde_json::Value;

/// Record of operations dropped by the batch cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Truncation {
    /// Operations supplied
    pub original: usize,
    /// Operations kept
    pub kept: usize,
}

/// Ordered operations, already cut to the configured cap
///
/// Truncation happens at construction, before any operation is looked at.
/// The cap is clamped to `1..=`[`DEFAULT_MAX_OPERATIONS`], so no
/// configuration can raise the hard limit or turn a non-empty batch into an
/// empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    operations: Vec<Operation>,
    truncation: Option<Truncation>,
}

impl Batch {
    /// Build from decoded operations, keeping at most `max` of them
    #[must_use]
    pub fn new(mut operations: Vec<Operation>, max: usize) -> Self {
        let max = effective_cap(max);
        let original = operations.len();
        let truncation = (original > max).then(|| {
            operations.truncate(max);
            Truncation {
                original,
                kept: max,
            }
        });
        Self {
            operations,
            truncation,
        }
    }

    /// Decode raw proposer records, keeping at most `max` of them
    ///
    /// Items past the cap are never decoded.
    #[must_use]
    pub fn from_raw(raw: &[Value], max: usize) -> Self {
        let max = effective_cap(max);
        let operations = raw.iter().take(max).map(Operation::from_value).collect();
        let truncation = (raw.len() > max).then_some(Truncation {
            original: raw.len(),
            kept: max,
        });
        Self {
            operations,
            truncation,
        }
    }

    /// Operations in application order
    #[inline]
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Truncation that happened at construction, if any
    #[inline]
    #[must_use]
    pub fn truncation(&self) -> Option<Truncation> {
        self.truncation
    }

    /// Number of operations kept
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if no operation survived
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Configured cap within the hard limit
#[inline]
fn effective_cap(max: usize) -> usize {
    max.clamp(1, DEFAULT_MAX_OPERATIONS)
}
