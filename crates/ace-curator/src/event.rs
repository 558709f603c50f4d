//! Curation diagnostics
//!
//! [`CurationEvent`]s are collected by the engine and handed to a
//! [`CurationSink`] once a batch commits. Sinks are best-effort: they cannot
//! fail, and nothing in the engine depends on what they do.

use crate::operation::OperationKind;
use crate::summary::CurationSummary;
use serde::Serialize;

/// One diagnostic observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CurationEvent {
    /// Batch exceeded the cap and was cut
    Truncated {
        /// Operations supplied
        original: usize,
        /// Operations kept
        kept: usize,
    },

    /// Operation referenced an id absent from the current document
    NonexistentReference {
        /// Missing id
        id: String,
        /// Referencing operation
        #[serde(serialize_with = "serialize_kind")]
        operation: OperationKind,
    },

    /// Non-blank section label matched no canonical section
    UnrecognizedSection {
        /// Trimmed label as supplied
        label: String,
        /// Operation carrying the label
        #[serde(serialize_with = "serialize_kind")]
        operation: OperationKind,
    },

    /// Entry removed by DELETE
    DeleteAudit {
        /// Removed id
        id: String,
        /// Bounded preview of the removed text
        preview: String,
        /// Caller-supplied reason
        reason: Option<String>,
    },

    /// Entry text rewritten by UPDATE
    UpdateAudit {
        /// Updated id
        id: String,
        /// Bounded preview of the previous text
        old_preview: String,
        /// Bounded preview of the new text
        new_preview: String,
    },

    /// Per-batch totals, always the last event of a report
    Summary(CurationSummary),
}

fn serialize_kind<S: serde::Serializer>(kind: &OperationKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.as_str())
}

/// Receiver of curation events
pub trait CurationSink {
    /// Observe one event
    fn record(&mut self, event: &CurationEvent);
}

impl<S: CurationSink + ?Sized> CurationSink for &mut S {
    fn record(&mut self, event: &CurationEvent) {
        (**self).record(event);
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CurationSink for NullSink {
    fn record(&mut self, _event: &CurationEvent) {}
}

/// Sink that keeps every event, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<CurationEvent>,
}

impl RecordingSink {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far
    #[inline]
    #[must_use]
    pub fn events(&self) -> &[CurationEvent] {
        &self.events
    }

    /// Take the recorded events
    #[inline]
    #[must_use]
    pub fn into_events(self) -> Vec<CurationEvent> {
        self.events
    }
}

impl CurationSink for RecordingSink {
    fn record(&mut self, event: &CurationEvent) {
        self.events.push(event.clone());
    }
}

/// Sink that forwards events to `tracing`
///
/// Dangling references and unrecognized sections log at `warn`, everything
/// else at `info`, all under the `ace_curator::events` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl CurationSink for TracingSink {
    fn record(&mut self, event: &CurationEvent) {
        match event {
            CurationEvent::Truncated { original, kept } => {
                tracing::warn!(target: "ace_curator::events", original, kept, "operations truncated");
            }
            CurationEvent::NonexistentReference { id, operation } => {
                tracing::warn!(
                    target: "ace_curator::events",
                    id = %id,
                    operation = %operation,
                    "reference to nonexistent entry"
                );
            }
            CurationEvent::UnrecognizedSection { label, operation } => {
                tracing::warn!(
                    target: "ace_curator::events",
                    label = %label,
                    operation = %operation,
                    "unrecognized section label"
                );
            }
            CurationEvent::DeleteAudit { id, preview, reason } => {
                tracing::info!(
                    target: "ace_curator::events",
                    id = %id,
                    preview = %preview,
                    reason = reason.as_deref().unwrap_or(""),
                    "entry deleted"
                );
            }
            CurationEvent::UpdateAudit {
                id,
                old_preview,
                new_preview,
            } => {
                tracing::info!(
                    target: "ace_curator::events",
                    id = %id,
                    old = %old_preview,
                    new = %new_preview,
                    "entry updated"
                );
            }
            CurationEvent::Summary(summary) => {
                tracing::info!(
                    target: "ace_curator::events",
                    applied = summary.total_applied(),
                    skipped = summary.total_skipped(),
                    "curation summary: {:?}",
                    summary.skip_reasons
                );
            }
        }
    }
}
