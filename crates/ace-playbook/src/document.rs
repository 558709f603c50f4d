//! The playbook document
//!
//! A [`Document`] holds one ordered entry list per canonical [`Section`].
//! Every section is always present, ids are unique across the whole
//! document, and lookups are recomputed from current state on every call.

use crate::entry::Entry;
use crate::error::PlaybookError;
use crate::id;
use crate::section::Section;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

/// Position of an entry inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Section holding the entry
    pub section: Section,
    /// Index within that section
    pub index: usize,
}

/// Sectioned collection of playbook entries
///
/// `Clone` is a full deep copy: entries own their strings, so a clone
/// shares no mutable structure with its source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<Section, Vec<Entry>>")]
pub struct Document {
    sections: [Vec<Entry>; Section::COUNT],
}

impl Document {
    /// Create an empty document with every section present
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from per-section entry lists
    ///
    /// Sections may appear more than once; their entries are appended in
    /// iteration order. Missing sections stay empty.
    ///
    /// # Errors
    /// Returns [`PlaybookError::DuplicateId`] if any id repeats
    pub fn from_sections<I>(sections: I) -> Result<Self, PlaybookError>
    where
        I: IntoIterator<Item = (Section, Vec<Entry>)>,
    {
        let mut document = Self::new();
        for (section, entries) in sections {
            for entry in entries {
                document.insert(section, entry)?;
            }
        }
        Ok(document)
    }

    /// Entries of one section, in order
    #[inline]
    #[must_use]
    pub fn entries(&self, section: Section) -> &[Entry] {
        &self.sections[section.index()]
    }

    /// Sections with their entries, in document order
    pub fn sections(&self) -> impl Iterator<Item = (Section, &[Entry])> + '_ {
        Section::ALL
            .into_iter()
            .map(move |section| (section, self.entries(section)))
    }

    /// Every entry with its section, in document order
    pub fn iter(&self) -> impl Iterator<Item = (Section, &Entry)> + '_ {
        self.sections()
            .flat_map(|(section, entries)| entries.iter().map(move |entry| (section, entry)))
    }

    /// Total number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.iter().map(Vec::len).sum()
    }

    /// Check if no section holds any entry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(Vec::is_empty)
    }

    /// Find an entry by id across all sections
    #[must_use]
    pub fn locate(&self, id: &str) -> Option<Location> {
        self.sections().find_map(|(section, entries)| {
            entries
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| Location { section, index })
        })
    }

    /// Entry with the given id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entry> {
        let location = self.locate(id)?;
        self.sections[location.section.index()].get(location.index)
    }

    /// Mutable entry with the given id
    ///
    /// Callers may change text and counters; changing `id` through this
    /// reference bypasses the uniqueness check.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entry> {
        let location = self.locate(id)?;
        self.sections[location.section.index()].get_mut(location.index)
    }

    /// Section currently holding `id`
    #[inline]
    #[must_use]
    pub fn section_of(&self, id: &str) -> Option<Section> {
        self.locate(id).map(|location| location.section)
    }

    /// Check if any section holds `id`
    #[inline]
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.locate(id).is_some()
    }

    /// Check if any entry anywhere has exactly this text
    #[must_use]
    pub fn contains_text(&self, text: &str) -> bool {
        self.iter().any(|(_, entry)| entry.text == text)
    }

    /// Set of all entry texts across the document
    #[must_use]
    pub fn texts(&self) -> HashSet<&str> {
        self.iter().map(|(_, entry)| entry.text.as_str()).collect()
    }

    /// Next generated id for `section`, based on its current entries
    #[must_use]
    pub fn next_id(&self, section: Section) -> String {
        id::generate_id(self.entries(section), section.slug())
    }

    /// Append an entry to a section
    ///
    /// # Errors
    /// Returns [`PlaybookError::DuplicateId`] if the id already exists
    /// anywhere in the document; the document is left unchanged.
    pub fn insert(&mut self, section: Section, entry: Entry) -> Result<(), PlaybookError> {
        if let Some(existing) = self.section_of(&entry.id) {
            return Err(PlaybookError::DuplicateId {
                id: entry.id,
                existing,
            });
        }
        self.sections[section.index()].push(entry);
        Ok(())
    }

    /// Remove an entry by id, returning it with the section it was in
    pub fn remove(&mut self, id: &str) -> Option<(Section, Entry)> {
        let location = self.locate(id)?;
        let entry = self.sections[location.section.index()].remove(location.index);
        Some((location.section, entry))
    }

    /// Keep only entries for which `keep` returns true
    ///
    /// Returns the removed entries with their sections, in document order.
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<(Section, Entry)>
    where
        F: FnMut(Section, &Entry) -> bool,
    {
        let mut removed = Vec::new();
        for section in Section::ALL {
            let slot = &mut self.sections[section.index()];
            let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(slot)
                .into_iter()
                .partition(|entry| keep(section, entry));
            *slot = kept;
            removed.extend(dropped.into_iter().map(|entry| (section, entry)));
        }
        removed
    }

    /// Render the document as prompt text
    #[inline]
    #[must_use]
    pub fn render(&self) -> String {
        crate::render::render(self)
    }
}

impl TryFrom<BTreeMap<Section, Vec<Entry>>> for Document {
    type Error = PlaybookError;

    fn try_from(map: BTreeMap<Section, Vec<Entry>>) -> Result<Self, Self::Error> {
        Self::from_sections(map)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Section::COUNT))?;
        for (section, entries) in self.sections() {
            map.serialize_entry(&section, entries)?;
        }
        map.end()
    }
}
