//! Counter evaluation pass
//!
//! Applies per-entry ratings from the reflection step. Each `helpful` or
//! `harmful` rating adds exactly one to the matching counter of the entry
//! found by id across all sections. Runs outside the atomic boundary.

use crate::error::CurateError;
use ace_playbook::{Document, PlaybookError};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// Reflection verdict on one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Entry helped
    Helpful,
    /// Entry misled
    Harmful,
    /// Entry was irrelevant; counters unchanged
    Neutral,
}

impl Rating {
    /// Parse a rating tag (trimmed, case-insensitive)
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        [Self::Helpful, Self::Harmful, Self::Neutral]
            .into_iter()
            .find(|rating| rating.as_str().eq_ignore_ascii_case(tag))
    }

    /// Lowercase tag
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Helpful => "helpful",
            Self::Harmful => "harmful",
            Self::Neutral => "neutral",
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationSummary {
    /// Helpful counters incremented
    pub helpful: usize,
    /// Harmful counters incremented
    pub harmful: usize,
    /// Neutral ratings seen
    pub neutral: usize,
    /// Malformed records, unknown tags and missing ids
    pub skipped: usize,
    /// Ids that matched no entry, in input order
    pub missing_ids: Vec<String>,
}

/// Apply one rating to the entry with `id`
///
/// Returns `Ok(false)` if no entry has that id.
///
/// # Errors
/// Returns [`CurateError::CounterOverflow`] if the counter is saturated
pub fn apply_rating(document: &mut Document, id: &str, rating: Rating) -> Result<bool, CurateError> {
    let Some(entry) = document.get_mut(id) else {
        return Ok(false);
    };
    let marked = match rating {
        Rating::Helpful => entry.mark_helpful(),
        Rating::Harmful => entry.mark_harmful(),
        Rating::Neutral => Ok(()),
    };
    marked.map_err(|err| match err {
        PlaybookError::CounterOverflow { id } => CurateError::CounterOverflow { id },
        other => CurateError::Model(other),
    })?;
    Ok(true)
}

/// Apply raw rating records in order
///
/// A record is an object with an `id` (or `name`) and a `tag` (or `rating`).
/// A record without a tag counts as neutral.
///
/// # Errors
/// Returns [`CurateError::CounterOverflow`] on a saturated counter. Ratings
/// before the failing one stay applied.
pub fn apply_ratings(document: &mut Document, ratings: &[Value]) -> Result<EvaluationSummary, CurateError> {
    let mut summary = EvaluationSummary::default();

    for record in ratings {
        let Some((id, rating)) = record.as_object().and_then(decode_rating) else {
            tracing::debug!("Skipping malformed rating: {}", record);
            summary.skipped += 1;
            continue;
        };
        let Some(rating) = rating else {
            summary.skipped += 1;
            continue;
        };
        if !apply_rating(document, id, rating)? {
            tracing::debug!("Rating for unknown entry {}", id);
            summary.skipped += 1;
            summary.missing_ids.push(id.to_string());
            continue;
        }
        match rating {
            Rating::Helpful => summary.helpful += 1,
            Rating::Harmful => summary.harmful += 1,
            Rating::Neutral => summary.neutral += 1,
        }
    }

    tracing::info!(
        "Applied ratings: {} helpful, {} harmful, {} neutral, {} skipped",
        summary.helpful,
        summary.harmful,
        summary.neutral,
        summary.skipped
    );
    Ok(summary)
}

/// Id plus parsed rating; the inner `None` marks an unrecognized tag
fn decode_rating(record: &Map<String, Value>) -> Option<(&str, Option<Rating>)> {
    let id = ["id", "name"]
        .into_iter()
        .find_map(|key| record.get(key).and_then(Value::as_str))
        .filter(|id| !id.trim().is_empty())?;
    let rating = match ["tag", "rating"].into_iter().find_map(|key| record.get(key)) {
        None | Some(Value::Null) => Some(Rating::Neutral),
        Some(Value::String(tag)) => Rating::parse(tag),
        Some(_) => None,
    };
    Some((id, rating))
}
