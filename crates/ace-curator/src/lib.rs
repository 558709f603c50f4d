//! ACE Curation Engine
//!
//! Applies batches of proposed playbook edits with per-operation skips and
//! all-or-nothing failure semantics.
//!
//! # Core Concepts
//!
//! - [`Operation`]: Defensively decoded ADD / UPDATE / MERGE / DELETE edit
//! - [`Batch`]: Operations cut to the configured cap before processing
//! - [`apply_batch`]: Sequential engine over a live working document
//! - [`apply_atomic`]: Snapshot, run, then commit or roll back
//! - [`prune`]: Removes entries whose harmful count dominates
//! - [`deduplicate`]: Folds near-duplicate entries into their first occurrence
//! - [`apply_ratings`]: Helpful/harmful counter evaluation
//! - [`CurationSink`]: Best-effort receiver of curation events
//!
//! # Example
//!
//! ```rust
//! use ace_curator::{apply_atomic, CuratorConfig, NullSink};
//! use ace_playbook::{Document, Section};
//! use serde_json::json;
//!
//! let doc = Document::new();
//! let ops = [json!({"type": "ADD", "text": "run tests first", "section": "PATTERNS & APPROACHES"})];
//! let outcome = apply_atomic(&doc, &ops, &CuratorConfig::default(), NullSink);
//!
//! assert!(outcome.is_committed());
//! assert_eq!(outcome.document().section_of("pat-001"), Some(Section::Patterns));
//! assert!(doc.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod atomic;
mod batch;
mod config;
mod dedup;
mod engine;
mod error;
mod evaluate;
mod event;
mod operation;
mod prune;
mod summary;
mod validate;

pub use atomic::{apply_atomic, apply_atomic_batch, apply_atomic_with, AtomicOutcome};
pub use batch::{Batch, Truncation};
pub use config::{
    CuratorConfig, DedupConfig, PruneConfig, DEFAULT_DEDUP_THRESHOLD, DEFAULT_MAX_OPERATIONS,
    DEFAULT_MIN_HARMFUL,
};
pub use dedup::{deduplicate, DedupGroup, DedupReport, Pairwise, Similarity};
pub use engine::apply_batch;
pub use error::CurateError;
pub use evaluate::{apply_rating, apply_ratings, EvaluationSummary, Rating};
pub use event::{CurationEvent, CurationSink, NullSink, RecordingSink, TracingSink};
pub use operation::{Operation, OperationKind, SourceIds};
pub use prune::{prune, should_prune, PruneReport};
pub use summary::{CurationReport, CurationSummary, KindCounts};
pub use validate::{
    validate, AddRequest, DeleteRequest, MergeRequest, UpdateRequest, Validated,
    ValidationFailure, MIN_MERGE_SOURCES,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
