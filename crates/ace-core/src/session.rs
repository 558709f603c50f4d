//! Session update pipeline
//!
//! One session's reflection output is applied in stages:
//!
//! 1. ratings update helpful/harmful counters in place
//! 2. curation operations run through the atomic wrapper
//! 3. near-duplicates are folded together, when a scorer is supplied
//! 4. pruning drops entries whose harmful count dominates
//!
//! When the payload carries no `operations` key at all, plain
//! `new_key_points` are turned into ADD operations instead. An explicit
//! empty `operations` list still suppresses them.

use crate::config::AceConfig;
use crate::error::AceError;
use ace_curator::{
    apply_atomic_batch, apply_ratings, deduplicate, prune, AtomicOutcome, Batch, CurateError,
    CurationReport, CurationSink, DedupReport, EvaluationSummary, Operation, PruneReport,
    Similarity,
};
use ace_playbook::Document;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reflection output for one session
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionUpdate {
    /// Per-entry ratings
    #[serde(alias = "bullet_tags")]
    pub evaluations: Vec<Value>,

    /// Curation operations; `None` when the key is absent or not a list
    #[serde(deserialize_with = "list_or_absent")]
    pub operations: Option<Vec<Value>>,

    /// Plain new guidance, used only when `operations` is absent
    pub new_key_points: Vec<Value>,
}

impl SessionUpdate {
    /// Decode a JSON payload
    ///
    /// # Errors
    /// Returns [`AceError::Decode`] if the payload is not a JSON object
    pub fn from_json_str(source: &str) -> Result<Self, AceError> {
        Ok(serde_json::from_str(source)?)
    }

    /// With curation operations
    #[must_use]
    pub fn with_operations(mut self, operations: Vec<Value>) -> Self {
        self.operations = Some(operations);
        self
    }

    /// With ratings
    #[must_use]
    pub fn with_evaluations(mut self, evaluations: Vec<Value>) -> Self {
        self.evaluations = evaluations;
        self
    }

    /// With plain key points
    #[must_use]
    pub fn with_new_key_points(mut self, new_key_points: Vec<Value>) -> Self {
        self.new_key_points = new_key_points;
        self
    }
}

fn list_or_absent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items),
        _ => None,
    })
}

/// What the curation stage did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurationStage {
    /// No operations to apply
    Unchanged,
    /// Batch committed
    Committed(CurationReport),
    /// Batch hit a defect; the pre-curation document was kept
    RolledBack(CurateError),
}

impl CurationStage {
    /// Engine report, when the batch committed
    #[must_use]
    pub fn report(&self) -> Option<&CurationReport> {
        match self {
            Self::Committed(report) => Some(report),
            _ => None,
        }
    }
}

/// What the dedup stage did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupStage {
    /// No scorer supplied
    Skipped,
    /// Pass completed, possibly merging nothing
    Applied(DedupReport),
    /// Scoring or summing failed; the document was left as it was
    Failed(CurateError),
}

/// Result of one session update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Document to persist
    pub document: Document,
    /// Ratings stage
    pub evaluation: EvaluationSummary,
    /// Curation stage
    pub curation: CurationStage,
    /// Whether curation ran on converted `new_key_points`
    pub from_key_points: bool,
    /// Dedup stage
    pub dedup: DedupStage,
    /// Pruning stage, when enabled
    pub pruned: Option<PruneReport>,
}

/// Run all stages of a session update
///
/// # Errors
/// Returns [`AceError::Curate`] if a rating overflows a counter. A curation
/// defect is not an error; see [`CurationStage::RolledBack`].
pub fn run_session_update(
    document: Document,
    update: &SessionUpdate,
    config: &AceConfig,
    sink: impl CurationSink,
) -> Result<SessionOutcome, AceError> {
    run_session_update_with(document, update, config, sink, None)
}

/// Run all stages of a session update, folding near-duplicates with
/// `similarity` between curation and pruning
///
/// # Errors
/// Same as [`run_session_update`]. A dedup failure is not an error; see
/// [`DedupStage::Failed`].
pub fn run_session_update_with(
    mut document: Document,
    update: &SessionUpdate,
    config: &AceConfig,
    sink: impl CurationSink,
    similarity: Option<&mut dyn Similarity>,
) -> Result<SessionOutcome, AceError> {
    let evaluation = apply_ratings(&mut document, &update.evaluations)?;

    let (batch, from_key_points) = match &update.operations {
        Some(operations) => (Batch::from_raw(operations, config.curator.max_operations), false),
        None => {
            let operations = update.new_key_points.iter().map(key_point_operation).collect();
            (Batch::new(operations, config.curator.max_operations), true)
        }
    };
    if from_key_points && !batch.is_empty() {
        tracing::info!("No operations supplied, adding {} key points", batch.len());
    }

    let (committed, curation) = match apply_atomic_batch(&document, batch, &config.curator, sink) {
        AtomicOutcome::Unchanged(_) => (None, CurationStage::Unchanged),
        AtomicOutcome::Committed { document, report } => {
            (Some(document), CurationStage::Committed(report))
        }
        AtomicOutcome::RolledBack { error, .. } => (None, CurationStage::RolledBack(error)),
    };
    let mut document = committed.unwrap_or(document);

    let dedup = match similarity {
        None => DedupStage::Skipped,
        Some(similarity) => match deduplicate(&mut document, similarity, &config.dedup) {
            Ok(report) => DedupStage::Applied(report),
            Err(error) => {
                tracing::warn!("Deduplication skipped: {}", error);
                DedupStage::Failed(error)
            }
        },
    };

    let pruned = config
        .prune_after_update
        .then(|| prune(&mut document, &config.prune));

    tracing::info!("Session update complete: {} entries", document.len());
    Ok(SessionOutcome {
        document,
        evaluation,
        curation,
        from_key_points,
        dedup,
        pruned,
    })
}

/// ADD for one plain key point: a string, or `{text, section?}`
fn key_point_operation(item: &Value) -> Operation {
    match item {
        Value::String(text) => Operation::add(text.as_str(), None),
        Value::Object(fields) => Operation::Add {
            text: fields.get("text").and_then(Value::as_str).map(str::to_string),
            section: fields.get("section").and_then(Value::as_str).map(str::to_string),
        },
        _ => Operation::Add {
            text: None,
            section: None,
        },
    }
}
