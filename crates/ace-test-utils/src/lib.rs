//! Testing utilities for the ACE workspace
//!
//! Shared fixtures: document builders, raw proposer records, and proptest
//! strategies.

#![allow(missing_docs)]

use ace_playbook::{Document, Entry, Section};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Incremental document fixture
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    sections: Vec<(Section, Vec<Entry>)>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(self, section: Section, id: &str, text: &str) -> Self {
        self.counted(section, id, text, 0, 0)
    }

    pub fn counted(mut self, section: Section, id: &str, text: &str, helpful: u64, harmful: u64) -> Self {
        self.sections
            .push((section, vec![Entry::with_counts(id, text, helpful, harmful)]));
        self
    }

    pub fn build(self) -> Document {
        Document::from_sections(self.sections).unwrap()
    }
}

/// Two patterns, one mistake and one legacy-id entry in OTHERS
pub fn sample_document() -> Document {
    DocumentBuilder::new()
        .counted(Section::Patterns, "pat-001", "use type hints", 5, 1)
        .counted(Section::Patterns, "pat-002", "prefer pathlib", 3, 0)
        .counted(Section::Mistakes, "mis-001", "bare except hides bugs", 0, 2)
        .counted(Section::Others, "kpt_001", "legacy key point", 1, 1)
        .build()
}

pub fn add_op(text: &str, section: Option<&str>) -> Value {
    match section {
        Some(section) => json!({"type": "ADD", "text": text, "section": section}),
        None => json!({"type": "ADD", "text": text}),
    }
}

pub fn update_op(target_id: &str, text: &str) -> Value {
    json!({"type": "UPDATE", "target_id": target_id, "text": text})
}

pub fn merge_op(source_ids: &[&str], merged_text: &str, section: Option<&str>) -> Value {
    match section {
        Some(section) => json!({
            "type": "MERGE",
            "source_ids": source_ids,
            "merged_text": merged_text,
            "section": section
        }),
        None => json!({"type": "MERGE", "source_ids": source_ids, "merged_text": merged_text}),
    }
}

pub fn delete_op(target_id: &str, reason: Option<&str>) -> Value {
    match reason {
        Some(reason) => json!({"type": "DELETE", "target_id": target_id, "reason": reason}),
        None => json!({"type": "DELETE", "target_id": target_id}),
    }
}

pub fn unknown_op(tag: &str) -> Value {
    json!({"type": tag})
}

/// `n` distinct ADDs into OTHERS
pub fn distinct_adds(n: usize) -> Vec<Value> {
    (0..n).map(|i| add_op(&format!("tip #{i}"), None)).collect()
}

pub fn arb_section() -> impl Strategy<Value = Section> {
    prop::sample::select(Section::ALL.to_vec())
}

/// Documents whose ids follow `{slug}-{NNN}`, with small counters
pub fn arb_document() -> impl Strategy<Value = Document> {
    prop::collection::vec((arb_section(), "[a-c]{1,3}", 0u64..6, 0u64..6), 0..12).prop_map(
        |rows| {
            let mut doc = Document::new();
            for (section, text, helpful, harmful) in rows {
                let id = doc.next_id(section);
                doc.insert(section, Entry::with_counts(id, text, helpful, harmful))
                    .unwrap();
            }
            doc
        },
    )
}

/// Ids likely to hit entries produced by [`arb_document`], plus misses
pub fn arb_id() -> impl Strategy<Value = String> {
    prop_oneof![
        (arb_section(), 1u64..5).prop_map(|(s, n)| format!("{}-{:03}", s.slug(), n)),
        Just("missing".to_string()),
    ]
}

pub fn arb_section_label() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        arb_section().prop_map(|s| Some(s.name().to_lowercase())),
        Just(Some("NOT A SECTION".to_string())),
        Just(Some("   ".to_string())),
    ]
}

/// Raw proposer records, valid and invalid
pub fn arb_raw_operation() -> impl Strategy<Value = Value> {
    prop_oneof![
        ("[a-d]{0,3}", arb_section_label())
            .prop_map(|(text, section)| json!({"type": "ADD", "text": text, "section": section})),
        (arb_id(), "[a-d]{0,3}")
            .prop_map(|(id, text)| json!({"type": "UPDATE", "target_id": id, "text": text})),
        (prop::collection::vec(arb_id(), 0..4), "[a-d]{0,3}", arb_section_label()).prop_map(
            |(ids, text, section)| {
                json!({"type": "MERGE", "source_ids": ids, "merged_text": text, "section": section})
            }
        ),
        arb_id().prop_map(|id| json!({"type": "DELETE", "target_id": id})),
        Just(json!({"type": "RENAME"})),
        Just(json!(42)),
    ]
}
