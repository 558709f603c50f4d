//! Harmfulness pruning
//!
//! Runs after the atomic step, on the document the caller adopted. It has no
//! rollback of its own.

use crate::config::PruneConfig;
use ace_playbook::{Document, Entry, Section};
use serde::Serialize;

/// Check if `entry` crosses the pruning threshold
#[inline]
#[must_use]
pub fn should_prune(entry: &Entry, config: &PruneConfig) -> bool {
    entry.harmful >= config.min_harmful && entry.harmful > entry.helpful
}

/// Entries removed by one pruning pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    /// Removed entries with the section they were in, in document order
    pub removed: Vec<(Section, Entry)>,
}

impl PruneReport {
    /// Ids of removed entries
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.removed.iter().map(|(_, entry)| entry.id.as_str())
    }

    /// Number of removed entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.removed.len()
    }

    /// Check if nothing was removed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Remove every entry that crosses the threshold
pub fn prune(document: &mut Document, config: &PruneConfig) -> PruneReport {
    let removed = document.retain(|_, entry| !should_prune(entry, config));
    for (section, entry) in &removed {
        tracing::info!(
            "Pruned {} from {} (helpful={}, harmful={})",
            entry.id,
            section,
            entry.helpful,
            entry.harmful
        );
    }
    PruneReport { removed }
}
