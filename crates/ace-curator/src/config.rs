//! Curator configuration

use ace_playbook::DEFAULT_PREVIEW_CHARS;
use serde::{Deserialize, Serialize};

/// Hard cap on operations per batch
pub const DEFAULT_MAX_OPERATIONS: usize = 10;

/// Harmful-count floor used by the pruning pass
pub const DEFAULT_MIN_HARMFUL: u64 = 3;

/// Similarity at or above which two entries count as duplicates
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 0.85;

/// Batch application settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratorConfig {
    /// Operations beyond this many are dropped before processing
    ///
    /// Clamped to `1..=`[`DEFAULT_MAX_OPERATIONS`] when a batch is built.
    pub max_operations: usize,
    /// Character budget for text previews in audit events
    pub preview_chars: usize,
}

impl CuratorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With batch cap
    #[inline]
    #[must_use]
    pub fn with_max_operations(mut self, max: usize) -> Self {
        self.max_operations = max;
        self
    }

    /// With preview budget
    #[inline]
    #[must_use]
    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            max_operations: DEFAULT_MAX_OPERATIONS,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Pruning thresholds
///
/// An entry is removed when `harmful >= min_harmful && harmful > helpful`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    /// Minimum harmful count before an entry can be removed
    pub min_harmful: u64,
}

impl PruneConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With harmful floor
    #[inline]
    #[must_use]
    pub fn with_min_harmful(mut self, min_harmful: u64) -> Self {
        self.min_harmful = min_harmful;
        self
    }
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            min_harmful: DEFAULT_MIN_HARMFUL,
        }
    }
}

/// Near-duplicate consolidation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Similarity threshold; clamped to `0.0..=1.0` when used
    pub threshold: f64,
}

impl DedupConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With similarity threshold
    #[inline]
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Threshold actually applied
    ///
    /// Out-of-range values are clamped and NaN falls back to
    /// [`DEFAULT_DEDUP_THRESHOLD`].
    #[must_use]
    pub fn effective_threshold(&self) -> f64 {
        if self.threshold.is_nan() {
            DEFAULT_DEDUP_THRESHOLD
        } else {
            self.threshold.clamp(0.0, 1.0)
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DEDUP_THRESHOLD,
        }
    }
}
