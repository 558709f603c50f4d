//! Pipeline configuration

use crate::error::AceError;
use ace_curator::{CuratorConfig, DedupConfig, PruneConfig, DEFAULT_MAX_OPERATIONS};
use serde::{Deserialize, Serialize};

/// Settings for one session update
///
/// ```toml
/// prune_after_update = true
///
/// [curator]
/// max_operations = 10
/// preview_chars = 80
///
/// [prune]
/// min_harmful = 3
///
/// [dedup]
/// threshold = 0.85
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AceConfig {
    /// Batch application settings
    pub curator: CuratorConfig,
    /// Pruning thresholds
    pub prune: PruneConfig,
    /// Near-duplicate consolidation, used when a scorer is supplied
    pub dedup: DedupConfig,
    /// Whether the pruning pass runs after curation
    pub prune_after_update: bool,
}

impl AceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With curator settings
    #[inline]
    #[must_use]
    pub fn with_curator(mut self, curator: CuratorConfig) -> Self {
        self.curator = curator;
        self
    }

    /// With pruning thresholds
    #[inline]
    #[must_use]
    pub fn with_prune(mut self, prune: PruneConfig) -> Self {
        self.prune = prune;
        self
    }

    /// With dedup settings
    #[inline]
    #[must_use]
    pub fn with_dedup(mut self, dedup: DedupConfig) -> Self {
        self.dedup = dedup;
        self
    }

    /// With or without the pruning pass
    #[inline]
    #[must_use]
    pub fn with_prune_after_update(mut self, enabled: bool) -> Self {
        self.prune_after_update = enabled;
        self
    }

    /// Parse and validate TOML configuration
    ///
    /// # Errors
    /// Returns [`AceError::Config`] on malformed TOML or out-of-range values
    pub fn from_toml_str(source: &str) -> Result<Self, AceError> {
        let config: Self = toml::from_str(source).map_err(|err| AceError::config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`AceError::Config`] naming the first invalid field
    pub fn validate(&self) -> Result<(), AceError> {
        if !(1..=DEFAULT_MAX_OPERATIONS).contains(&self.curator.max_operations) {
            return Err(AceError::config(format!(
                "curator.max_operations must be between 1 and {DEFAULT_MAX_OPERATIONS}"
            )));
        }
        if self.curator.preview_chars == 0 {
            return Err(AceError::config("curator.preview_chars must be at least 1"));
        }
        if self.prune.min_harmful == 0 {
            return Err(AceError::config("prune.min_harmful must be at least 1"));
        }
        if self.dedup.threshold.is_nan() {
            return Err(AceError::config("dedup.threshold must be a number"));
        }
        Ok(())
    }
}

impl Default for AceConfig {
    fn default() -> Self {
        Self {
            curator: CuratorConfig::default(),
            prune: PruneConfig::default(),
            dedup: DedupConfig::default(),
            prune_after_update: true,
        }
    }
}
