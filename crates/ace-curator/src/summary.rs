//! Batch outcome bookkeeping

use crate::batch::Truncation;
use crate::event::CurationEvent;
use crate::operation::OperationKind;
use serde::Serialize;
use std::fmt::Display;

/// Applied/skipped tally for one operation kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    /// Operations that changed the document
    pub applied: usize,
    /// Operations recorded as no-ops
    pub skipped: usize,
}

/// Per-batch summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurationSummary {
    /// ADD tally
    pub add: KindCounts,
    /// UPDATE tally
    pub update: KindCounts,
    /// MERGE tally
    pub merge: KindCounts,
    /// DELETE tally
    pub delete: KindCounts,
    /// Unknown-type tally (never applied)
    pub unknown: KindCounts,
    /// Human-readable skip reasons, in batch order
    pub skip_reasons: Vec<String>,
    /// Cap enforcement, if the batch was cut
    pub truncation: Option<Truncation>,
}

impl CurationSummary {
    /// Tally for one kind
    #[must_use]
    pub fn counts(&self, kind: OperationKind) -> KindCounts {
        match kind {
            OperationKind::Add => self.add,
            OperationKind::Update => self.update,
            OperationKind::Merge => self.merge,
            OperationKind::Delete => self.delete,
            OperationKind::Unknown => self.unknown,
        }
    }

    fn counts_mut(&mut self, kind: OperationKind) -> &mut KindCounts {
        match kind {
            OperationKind::Add => &mut self.add,
            OperationKind::Update => &mut self.update,
            OperationKind::Merge => &mut self.merge,
            OperationKind::Delete => &mut self.delete,
            OperationKind::Unknown => &mut self.unknown,
        }
    }

    /// Count an applied operation
    pub fn record_applied(&mut self, kind: OperationKind) {
        self.counts_mut(kind).applied += 1;
    }

    /// Count a skipped operation with its reason
    pub fn record_skip(&mut self, index: usize, kind: OperationKind, reason: impl Display) {
        self.counts_mut(kind).skipped += 1;
        self.skip_reasons.push(format!("op[{index}] {kind}: {reason}"));
    }

    fn all(&self) -> [KindCounts; 5] {
        [self.add, self.update, self.merge, self.delete, self.unknown]
    }

    /// Operations applied across all kinds
    #[must_use]
    pub fn total_applied(&self) -> usize {
        self.all().iter().map(|c| c.applied).sum()
    }

    /// Operations skipped across all kinds
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.all().iter().map(|c| c.skipped).sum()
    }

    /// Check if nothing was applied
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.total_applied() == 0
    }
}

/// Everything the engine observed while applying one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurationReport {
    /// Counts and skip reasons
    pub summary: CurationSummary,
    /// Diagnostic events in the order they occurred
    pub events: Vec<CurationEvent>,
}

impl CurationReport {
    /// Events of a given shape
    pub fn events_matching<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = &'a CurationEvent>
    where
        F: Fn(&CurationEvent) -> bool + 'a,
    {
        self.events.iter().filter(move |event| predicate(event))
    }
}
