//! All-or-nothing batch application
//!
//! The original document is only ever borrowed. A non-empty batch runs
//! against a deep copy, which is either handed back as the new document or
//! dropped on a defect.

use crate::batch::Batch;
use crate::config::CuratorConfig;
use crate::engine::apply_batch;
use crate::error::CurateError;
use crate::event::CurationSink;
use crate::summary::CurationReport;
use ace_playbook::Document;
use serde_json::Value;
use std::borrow::Cow;

/// Result of one atomic batch run
#[derive(Debug)]
pub enum AtomicOutcome<'a> {
    /// Empty batch; the original is returned and nothing was copied
    Unchanged(&'a Document),

    /// Batch completed; `document` is a fresh, independent copy
    Committed {
        /// Working copy after the batch
        document: Document,
        /// What happened to each operation
        report: CurationReport,
    },

    /// Engine hit a defect; the working copy was discarded
    RolledBack {
        /// The untouched original
        original: &'a Document,
        /// Defect that caused the rollback
        error: CurateError,
    },
}

impl<'a> AtomicOutcome<'a> {
    /// Document the caller should adopt
    #[must_use]
    pub fn document(&self) -> &Document {
        match self {
            Self::Unchanged(original) | Self::RolledBack { original, .. } => *original,
            Self::Committed { document, .. } => document,
        }
    }

    /// Take the document the caller should adopt
    ///
    /// Borrowed unless the batch committed.
    #[must_use]
    pub fn into_document(self) -> Cow<'a, Document> {
        match self {
            Self::Unchanged(original) | Self::RolledBack { original, .. } => {
                Cow::Borrowed(original)
            }
            Self::Committed { document, .. } => Cow::Owned(document),
        }
    }

    /// Engine report, when the batch committed
    #[inline]
    #[must_use]
    pub fn report(&self) -> Option<&CurationReport> {
        match self {
            Self::Committed { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Rollback cause, if any
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&CurateError> {
        match self {
            Self::RolledBack { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Check if the empty-batch fast path was taken
    #[inline]
    #[must_use]
    pub fn is_fast_path(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }

    /// Check if the batch committed
    #[inline]
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    /// Check if the batch was rolled back
    #[inline]
    #[must_use]
    pub fn is_rolled_back(&self) -> bool {
        matches!(self, Self::RolledBack { .. })
    }
}

/// Decode and apply raw proposer operations atomically
pub fn apply_atomic<'a>(
    document: &'a Document,
    raw: &[Value],
    config: &CuratorConfig,
    sink: impl CurationSink,
) -> AtomicOutcome<'a> {
    let batch = Batch::from_raw(raw, config.max_operations);
    apply_atomic_batch(document, batch, config, sink)
}

/// Apply an already-built batch atomically
pub fn apply_atomic_batch<'a>(
    document: &'a Document,
    batch: Batch,
    config: &CuratorConfig,
    sink: impl CurationSink,
) -> AtomicOutcome<'a> {
    apply_atomic_with(document, batch, config, sink, apply_batch)
}

/// Apply a batch atomically through a caller-supplied engine
///
/// Events in the engine's report reach `sink` only if the batch commits.
pub fn apply_atomic_with<'a, F>(
    document: &'a Document,
    batch: Batch,
    config: &CuratorConfig,
    mut sink: impl CurationSink,
    engine: F,
) -> AtomicOutcome<'a>
where
    F: FnOnce(Document, &Batch, &CuratorConfig) -> Result<(Document, CurationReport), CurateError>,
{
    if batch.is_empty() {
        tracing::debug!("Empty batch, document unchanged");
        return AtomicOutcome::Unchanged(document);
    }

    let working = document.clone();
    match engine(working, &batch, config) {
        Ok((document, report)) => {
            for event in &report.events {
                sink.record(event);
            }
            AtomicOutcome::Committed { document, report }
        }
        Err(error) => {
            tracing::error!("Curation batch rolled back: {}", error);
            AtomicOutcome::RolledBack {
                original: document,
                error,
            }
        }
    }
}
