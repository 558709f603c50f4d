//! Curation operations
//!
//! Proposer output is loosely typed JSON. [`Operation::from_value`] decodes
//! it defensively: wrong shapes become missing or malformed fields for the
//! validator to reject, and unrecognized tags become [`Operation::Unknown`].
//! Decoding itself never fails.

use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// Operation type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    /// Create a new entry
    Add,
    /// Rewrite an entry's text
    Update,
    /// Fold several entries into one
    Merge,
    /// Remove an entry
    Delete,
    /// Absent or unrecognized tag
    Unknown,
}

impl OperationKind {
    /// Wire tag, as proposers spell it
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Update => "UPDATE",
            Self::Merge => "MERGE",
            Self::Delete => "DELETE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Match a wire tag (trimmed, case-sensitive)
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "ADD" => Some(Self::Add),
            "UPDATE" => Some(Self::Update),
            "MERGE" => Some(Self::Merge),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded `source_ids` field of a MERGE
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceIds {
    /// Field absent or `null`
    Missing,
    /// Present but not a list of strings
    Malformed,
    /// Ordered list of ids as given
    Ids(Vec<String>),
}

/// One proposed edit
///
/// String fields are `None` when absent, `null` or not a string; the
/// validator decides whether that is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Append a new entry
    Add {
        /// Entry text
        text: Option<String>,
        /// Requested section label
        section: Option<String>,
    },

    /// Replace an entry's text in place
    Update {
        /// Entry to rewrite
        target_id: Option<String>,
        /// Replacement text
        text: Option<String>,
    },

    /// Combine entries into a new one with summed counters
    Merge {
        /// Entries to consume
        source_ids: SourceIds,
        /// Text of the combined entry
        merged_text: Option<String>,
        /// Explicit placement, overriding the inherited section
        section: Option<String>,
    },

    /// Remove an entry
    Delete {
        /// Entry to remove
        target_id: Option<String>,
        /// Audit-only justification, never stored
        reason: Option<String>,
    },

    /// Anything without a recognized tag
    Unknown {
        /// Raw tag, when one was present as a string
        tag: Option<String>,
    },
}

impl Operation {
    /// ADD with optional section
    #[must_use]
    pub fn add(text: impl Into<String>, section: Option<&str>) -> Self {
        Self::Add {
            text: Some(text.into()),
            section: section.map(str::to_string),
        }
    }

    /// UPDATE of `target_id`
    #[must_use]
    pub fn update(target_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Update {
            target_id: Some(target_id.into()),
            text: Some(text.into()),
        }
    }

    /// MERGE of `source_ids` with optional explicit section
    #[must_use]
    pub fn merge<I, S>(source_ids: I, merged_text: impl Into<String>, section: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Merge {
            source_ids: SourceIds::Ids(source_ids.into_iter().map(Into::into).collect()),
            merged_text: Some(merged_text.into()),
            section: section.map(str::to_string),
        }
    }

    /// DELETE of `target_id`
    #[must_use]
    pub fn delete(target_id: impl Into<String>, reason: Option<&str>) -> Self {
        Self::Delete {
            target_id: Some(target_id.into()),
            reason: reason.map(str::to_string),
        }
    }

    /// Operation type
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Add { .. } => OperationKind::Add,
            Self::Update { .. } => OperationKind::Update,
            Self::Merge { .. } => OperationKind::Merge,
            Self::Delete { .. } => OperationKind::Delete,
            Self::Unknown { .. } => OperationKind::Unknown,
        }
    }

    /// Decode a raw proposer record
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unknown { tag: None };
        };
        let tag = object.get("type").and_then(Value::as_str);
        let Some(kind) = tag.and_then(OperationKind::from_tag) else {
            return Self::Unknown {
                tag: tag.map(str::to_string),
            };
        };

        match kind {
            OperationKind::Add => Self::Add {
                text: string_field(object, "text"),
                section: label_field(object, "section"),
            },
            OperationKind::Update => Self::Update {
                target_id: string_field(object, "target_id"),
                text: string_field(object, "text"),
            },
            OperationKind::Merge => Self::Merge {
                source_ids: source_ids_field(object),
                merged_text: string_field(object, "merged_text"),
                section: label_field(object, "section"),
            },
            OperationKind::Delete => Self::Delete {
                target_id: string_field(object, "target_id"),
                reason: string_field(object, "reason"),
            },
            OperationKind::Unknown => Self::Unknown {
                tag: tag.map(str::to_string),
            },
        }
    }
}

impl From<&Value> for Operation {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Section labels keep non-string values in textual form so they are
/// reported as unrecognized instead of silently treated as absent.
fn label_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(label) => Some(label.clone()),
        other => Some(other.to_string()),
    }
}

fn source_ids_field(object: &Map<String, Value>) -> SourceIds {
    match object.get("source_ids") {
        None | Some(Value::Null) => SourceIds::Missing,
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map_or(SourceIds::Malformed, SourceIds::Ids),
        Some(_) => SourceIds::Malformed,
    }
}
