//! Canonical playbook sections
//!
//! Provides [`Section`], the closed set of buckets every playbook entry lives
//! in, and the label resolution used when an operation names a section.

use crate::error::PlaybookError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One of the five canonical playbook sections
///
/// Declaration order is document order: rendering, iteration and
/// serialization all walk sections in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    /// Reusable approaches that worked
    #[serde(rename = "PATTERNS & APPROACHES")]
    Patterns,

    /// Pitfalls observed in past sessions
    #[serde(rename = "MISTAKES TO AVOID")]
    Mistakes,

    /// Stated or inferred user preferences
    #[serde(rename = "USER PREFERENCES")]
    Preferences,

    /// Facts about the project itself
    #[serde(rename = "PROJECT CONTEXT")]
    Context,

    /// Default bucket
    #[serde(rename = "OTHERS")]
    Others,
}

impl Section {
    /// Number of canonical sections
    pub const COUNT: usize = 5;

    /// All sections in document order
    pub const ALL: [Section; Self::COUNT] = [
        Self::Patterns,
        Self::Mistakes,
        Self::Preferences,
        Self::Context,
        Self::Others,
    ];

    /// Section used when a label is absent or unrecognized
    pub const DEFAULT: Section = Self::Others;

    /// Canonical display name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Patterns => "PATTERNS & APPROACHES",
            Self::Mistakes => "MISTAKES TO AVOID",
            Self::Preferences => "USER PREFERENCES",
            Self::Context => "PROJECT CONTEXT",
            Self::Others => "OTHERS",
        }
    }

    /// Identifier prefix for entries generated in this section
    #[inline]
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Patterns => "pat",
            Self::Mistakes => "mis",
            Self::Preferences => "pref",
            Self::Context => "ctx",
            Self::Others => "oth",
        }
    }

    /// Position in document order
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Exact, case-insensitive match of a trimmed label
    ///
    /// Returns `None` for empty labels and for anything that is not a
    /// canonical name. No fuzzy or substring matching is attempted.
    #[must_use]
    pub fn lookup(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|section| section.name().eq_ignore_ascii_case(trimmed))
    }

    /// Resolve an optional label to a canonical section
    ///
    /// Always succeeds: absent, blank or unrecognized labels resolve to
    /// [`Section::DEFAULT`]. Use [`SectionLabel`] when the caller needs to
    /// tell "nothing specified" apart from "specified something unknown".
    #[must_use]
    pub fn resolve(label: Option<&str>) -> Self {
        SectionLabel::classify(label).or_default()
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = PlaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| PlaybookError::UnknownSection(s.to_string()))
    }
}

/// Outcome of resolving a caller-supplied section label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLabel<'a> {
    /// Label absent or blank after trimming
    Unspecified,

    /// Label matched a canonical section
    Known(Section),

    /// Label was non-blank but matched nothing
    Unrecognized(&'a str),
}

impl<'a> SectionLabel<'a> {
    /// Classify an optional label
    #[must_use]
    pub fn classify(label: Option<&'a str>) -> Self {
        match label.map(str::trim) {
            None | Some("") => Self::Unspecified,
            Some(trimmed) => match Section::lookup(trimmed) {
                Some(section) => Self::Known(section),
                None => Self::Unrecognized(trimmed),
            },
        }
    }

    /// Matched section, if any
    #[inline]
    #[must_use]
    pub fn known(self) -> Option<Section> {
        match self {
            Self::Known(section) => Some(section),
            _ => None,
        }
    }

    /// Section this label falls back to when nothing else applies
    #[inline]
    #[must_use]
    pub fn or_default(self) -> Section {
        self.known().unwrap_or(Section::DEFAULT)
    }
}
