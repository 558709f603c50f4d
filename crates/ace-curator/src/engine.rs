//! Batch application engine
//!
//! Applies a [`Batch`] to a document it owns, strictly in order. Every
//! lookup runs against the live working document, so an operation sees the
//! effect of every operation before it in the same batch.
//!
//! Invalid, dangling and unknown operations are skips and end up in the
//! [`CurationReport`]. Only defects are returned as [`CurateError`].

use crate::batch::Batch;
use crate::config::CuratorConfig;
use crate::error::CurateError;
use crate::event::CurationEvent;
use crate::operation::{Operation, OperationKind};
use crate::summary::CurationReport;
use crate::validate::{
    validate, AddRequest, DeleteRequest, MergeRequest, UpdateRequest, Validated,
    ValidationFailure, MIN_MERGE_SOURCES,
};
use ace_playbook::{preview, Document, Entry, PlaybookError, Section, SectionLabel};

/// Why an operation left the document untouched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
enum SkipReason {
    #[error("{0}")]
    Invalid(ValidationFailure),

    #[error("duplicate text already present in playbook")]
    DuplicateText,

    #[error("target '{0}' does not exist")]
    MissingTarget(String),

    #[error("only {0} of the source ids exist, need at least 2")]
    TooFewLiveSources(usize),

    #[error("unknown operation type '{0}'")]
    UnknownType(String),

    #[error("missing operation type")]
    MissingType,
}

/// Result of one operation that did not hit a defect
enum Step {
    Applied,
    Skipped(SkipReason),
}

/// Apply `batch` to `document`
///
/// Takes the document by value: the caller decides whether that is the
/// original or a working copy.
///
/// # Errors
/// Returns [`CurateError`] on a defect. The partially mutated document is
/// dropped with the error.
pub fn apply_batch(
    document: Document,
    batch: &Batch,
    config: &CuratorConfig,
) -> Result<(Document, CurationReport), CurateError> {
    let mut curator = Curator::new(document, config);

    if let Some(truncation) = batch.truncation() {
        tracing::warn!(
            "Truncating batch from {} to {} operations",
            truncation.original,
            truncation.kept
        );
        curator.report.summary.truncation = Some(truncation);
        curator.report.events.push(CurationEvent::Truncated {
            original: truncation.original,
            kept: truncation.kept,
        });
    }

    for (index, operation) in batch.operations().iter().enumerate() {
        curator.apply(index, operation)?;
    }

    Ok(curator.finish())
}

struct Curator<'c> {
    document: Document,
    report: CurationReport,
    config: &'c CuratorConfig,
}

impl<'c> Curator<'c> {
    fn new(document: Document, config: &'c CuratorConfig) -> Self {
        Self {
            document,
            report: CurationReport::default(),
            config,
        }
    }

    fn apply(&mut self, index: usize, operation: &Operation) -> Result<(), CurateError> {
        let kind = operation.kind();
        let step = match validate(operation) {
            Err(failure) => Step::Skipped(SkipReason::Invalid(failure)),
            Ok(Validated::Add(request)) => self.add(request)?,
            Ok(Validated::Update(request)) => self.update(request),
            Ok(Validated::Merge(request)) => self.merge(request)?,
            Ok(Validated::Delete(request)) => self.delete(request),
            Ok(Validated::Unknown(tag)) => Step::Skipped(
                tag.map_or(SkipReason::MissingType, |t| SkipReason::UnknownType(t.to_string())),
            ),
        };

        match step {
            Step::Applied => {
                tracing::debug!("op[{}] {} applied", index, kind);
                self.report.summary.record_applied(kind);
            }
            Step::Skipped(reason) => {
                tracing::debug!("op[{}] {} skipped: {}", index, kind, reason);
                self.report.summary.record_skip(index, kind, reason);
            }
        }
        Ok(())
    }

    fn finish(mut self) -> (Document, CurationReport) {
        let summary = &self.report.summary;
        tracing::info!(
            "Curation batch finished: {} applied, {} skipped",
            summary.total_applied(),
            summary.total_skipped()
        );
        self.report
            .events
            .push(CurationEvent::Summary(self.report.summary.clone()));
        (self.document, self.report)
    }

    fn add(&mut self, request: AddRequest<'_>) -> Result<Step, CurateError> {
        if self.document.texts().contains(request.text) {
            return Ok(Step::Skipped(SkipReason::DuplicateText));
        }

        let section = self
            .resolve_section(request.section, OperationKind::Add)
            .or_default();

        let id = self.document.next_id(section);
        self.insert(section, Entry::new(id, request.text))?;
        Ok(Step::Applied)
    }

    fn update(&mut self, request: UpdateRequest<'_>) -> Step {
        let limit = self.config.preview_chars;
        let Some(entry) = self.document.get_mut(request.target_id) else {
            return self.missing_target(request.target_id, OperationKind::Update);
        };

        let old_preview = preview(&entry.text, limit);
        request.text.clone_into(&mut entry.text);
        self.report.events.push(CurationEvent::UpdateAudit {
            id: request.target_id.to_string(),
            old_preview,
            new_preview: preview(request.text, limit),
        });
        Step::Applied
    }

    fn merge(&mut self, request: MergeRequest<'_>) -> Result<Step, CurateError> {
        let mut live: Vec<(&str, Section)> = Vec::with_capacity(request.source_ids.len());
        for id in request.source_ids {
            if live.iter().any(|(seen, _)| *seen == id.as_str()) {
                continue;
            }
            match self.document.section_of(id) {
                Some(section) => live.push((id.as_str(), section)),
                None => self.reference_event(id, OperationKind::Merge),
            }
        }

        let Some(&(_, inherited)) = live.first() else {
            return Ok(Step::Skipped(SkipReason::TooFewLiveSources(0)));
        };
        if live.len() < MIN_MERGE_SOURCES {
            return Ok(Step::Skipped(SkipReason::TooFewLiveSources(live.len())));
        }

        let target = self
            .resolve_section(request.section, OperationKind::Merge)
            .known()
            .unwrap_or(inherited);

        // The id is taken before the sources leave the target section.
        let id = self.document.next_id(target);

        let (mut helpful, mut harmful) = (0_u64, 0_u64);
        for (source, _) in &live {
            let Some(entry) = self.document.get(source) else {
                return Err(CurateError::engine(format!(
                    "merge source '{source}' vanished during merge"
                )));
            };
            let overflow = || CurateError::CounterOverflow { id: id.clone() };
            helpful = helpful.checked_add(entry.helpful).ok_or_else(overflow)?;
            harmful = harmful.checked_add(entry.harmful).ok_or_else(overflow)?;
        }

        for (source, _) in &live {
            self.document.remove(source);
        }
        self.insert(
            target,
            Entry::with_counts(id, request.merged_text, helpful, harmful),
        )?;
        Ok(Step::Applied)
    }

    fn delete(&mut self, request: DeleteRequest<'_>) -> Step {
        let Some((_, removed)) = self.document.remove(request.target_id) else {
            return self.missing_target(request.target_id, OperationKind::Delete);
        };

        tracing::info!("Deleted entry {}", removed.id);
        self.report.events.push(CurationEvent::DeleteAudit {
            preview: preview(&removed.text, self.config.preview_chars),
            id: removed.id,
            reason: request.reason.map(str::to_string),
        });
        Step::Applied
    }

    /// Classify `label`, reporting it when it names no section
    fn resolve_section<'l>(
        &mut self,
        label: Option<&'l str>,
        operation: OperationKind,
    ) -> SectionLabel<'l> {
        let classified = SectionLabel::classify(label);
        if let SectionLabel::Unrecognized(label) = classified {
            self.report.events.push(CurationEvent::UnrecognizedSection {
                label: label.to_string(),
                operation,
            });
        }
        classified
    }

    fn insert(&mut self, section: Section, entry: Entry) -> Result<(), CurateError> {
        self.document
            .insert(section, entry)
            .map_err(|err| match err {
                PlaybookError::DuplicateId { id, .. } => CurateError::IdCollision { id },
                other => CurateError::Model(other),
            })
    }

    fn missing_target(&mut self, id: &str, operation: OperationKind) -> Step {
        self.reference_event(id, operation);
        Step::Skipped(SkipReason::MissingTarget(id.to_string()))
    }

    fn reference_event(&mut self, id: &str, operation: OperationKind) {
        tracing::debug!("{} references nonexistent id {}", operation, id);
        self.report.events.push(CurationEvent::NonexistentReference {
            id: id.to_string(),
            operation,
        });
    }
}
