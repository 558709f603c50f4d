//! Per-operation field validation
//!
//! Checks only the shape of an operation. Existence checks need live state
//! and happen in the engine, after validation succeeds.

use crate::operation::{Operation, SourceIds};

/// Minimum number of source ids a MERGE must name
pub const MIN_MERGE_SOURCES: usize = 2;

/// Reason an operation was rejected before touching the document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    /// `text` absent, not a string, or blank
    #[error("text is missing or blank")]
    BlankText,

    /// `target_id` absent, not a string, or blank
    #[error("target_id is missing or blank")]
    BlankTargetId,

    /// `merged_text` absent, not a string, or blank
    #[error("merged_text is missing or blank")]
    BlankMergedText,

    /// `source_ids` absent
    #[error("source_ids is missing")]
    MissingSourceIds,

    /// `source_ids` not a list of strings
    #[error("source_ids must be a list of strings")]
    MalformedSourceIds,

    /// `source_ids` shorter than [`MIN_MERGE_SOURCES`]
    #[error("source_ids needs at least 2 ids, got {0}")]
    TooFewSourceIds(usize),
}

/// Validated ADD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddRequest<'a> {
    /// Non-blank entry text
    pub text: &'a str,
    /// Raw section label
    pub section: Option<&'a str>,
}

/// Validated UPDATE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRequest<'a> {
    /// Non-blank target id
    pub target_id: &'a str,
    /// Non-blank replacement text
    pub text: &'a str,
}

/// Validated MERGE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRequest<'a> {
    /// At least [`MIN_MERGE_SOURCES`] ids, in the order given
    pub source_ids: &'a [String],
    /// Non-blank merged text
    pub merged_text: &'a str,
    /// Raw section label
    pub section: Option<&'a str>,
}

/// Validated DELETE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRequest<'a> {
    /// Non-blank target id
    pub target_id: &'a str,
    /// Audit-only reason
    pub reason: Option<&'a str>,
}

/// Operation whose fields passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validated<'a> {
    /// Well-formed ADD
    Add(AddRequest<'a>),
    /// Well-formed UPDATE
    Update(UpdateRequest<'a>),
    /// Well-formed MERGE
    Merge(MergeRequest<'a>),
    /// Well-formed DELETE
    Delete(DeleteRequest<'a>),
    /// Unrecognized tag; always skipped by the engine
    Unknown(Option<&'a str>),
}

/// Check an operation's fields
///
/// # Errors
/// Returns the first [`ValidationFailure`] found, checking fields in
/// declaration order.
pub fn validate(operation: &Operation) -> Result<Validated<'_>, ValidationFailure> {
    match operation {
        Operation::Add { text, section } => Ok(Validated::Add(AddRequest {
            text: non_blank(text.as_deref()).ok_or(ValidationFailure::BlankText)?,
            section: section.as_deref(),
        })),
        Operation::Update { target_id, text } => Ok(Validated::Update(UpdateRequest {
            target_id: non_blank(target_id.as_deref()).ok_or(ValidationFailure::BlankTargetId)?,
            text: non_blank(text.as_deref()).ok_or(ValidationFailure::BlankText)?,
        })),
        Operation::Merge {
            source_ids,
            merged_text,
            section,
        } => {
            let source_ids = match source_ids {
                SourceIds::Missing => return Err(ValidationFailure::MissingSourceIds),
                SourceIds::Malformed => return Err(ValidationFailure::MalformedSourceIds),
                SourceIds::Ids(ids) if ids.len() < MIN_MERGE_SOURCES => {
                    return Err(ValidationFailure::TooFewSourceIds(ids.len()))
                }
                SourceIds::Ids(ids) => ids.as_slice(),
            };
            Ok(Validated::Merge(MergeRequest {
                source_ids,
                merged_text: non_blank(merged_text.as_deref())
                    .ok_or(ValidationFailure::BlankMergedText)?,
                section: section.as_deref(),
            }))
        }
        Operation::Delete { target_id, reason } => Ok(Validated::Delete(DeleteRequest {
            target_id: non_blank(target_id.as_deref()).ok_or(ValidationFailure::BlankTargetId)?,
            reason: reason.as_deref(),
        })),
        Operation::Unknown { tag } => Ok(Validated::Unknown(tag.as_deref())),
    }
}

/// The value itself (untrimmed) if it has non-whitespace content
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
