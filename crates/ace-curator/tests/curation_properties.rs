//! Invariants that must hold for arbitrary documents and batches.

use ace_curator::{
    apply_atomic, apply_atomic_with, apply_batch, prune, should_prune, Batch, CurateError,
    CurationEvent, CuratorConfig, NullSink, PruneConfig,
};
use ace_playbook::{Document, Entry, Section};
use ace_test_utils::{arb_document, arb_id, arb_raw_operation, merge_op};
use proptest::prelude::*;
use std::collections::HashSet;

fn counter_totals(doc: &Document) -> (u64, u64) {
    doc.iter()
        .fold((0, 0), |(h, r), (_, e)| (h + e.helpful, r + e.harmful))
}

fn ids_unique(doc: &Document) -> bool {
    let mut seen = HashSet::new();
    doc.iter().all(|(_, e)| seen.insert(e.id.clone()))
}

proptest! {
    #[test]
    fn original_is_never_mutated(
        doc in arb_document(),
        ops in proptest::collection::vec(arb_raw_operation(), 0..14),
    ) {
        let before = doc.clone();
        let outcome = apply_atomic(&doc, &ops, &CuratorConfig::default(), NullSink);
        prop_assert_eq!(&doc, &before);
        prop_assert!(!outcome.is_rolled_back());
        prop_assert!(ids_unique(outcome.document()));
    }

    #[test]
    fn injected_defect_returns_original(
        doc in arb_document(),
        ops in proptest::collection::vec(arb_raw_operation(), 1..10),
    ) {
        let before = doc.clone();
        let batch = Batch::from_raw(&ops, 10);
        let outcome = apply_atomic_with(&doc, batch, &CuratorConfig::default(), NullSink, |d, b, c| {
            apply_batch(d, b, c)?;
            Err(CurateError::engine("injected"))
        });
        prop_assert!(outcome.is_rolled_back());
        prop_assert_eq!(outcome.document(), &before);
    }

    #[test]
    fn every_kept_operation_is_accounted_for(
        doc in arb_document(),
        ops in proptest::collection::vec(arb_raw_operation(), 1..14),
    ) {
        let outcome = apply_atomic(&doc, &ops, &CuratorConfig::default(), NullSink);
        let report = outcome.report().unwrap();
        let summary = &report.summary;
        prop_assert_eq!(summary.total_applied() + summary.total_skipped(), ops.len().min(10));
        prop_assert_eq!(summary.skip_reasons.len(), summary.total_skipped());
        prop_assert_eq!(summary.unknown.applied, 0);
        prop_assert!(matches!(report.events.last(), Some(CurationEvent::Summary(_))));
        if ops.len() > 10 {
            prop_assert!(
                matches!(report.events[0], CurationEvent::Truncated { original, kept: 10 } if original == ops.len()),
                "truncation must be the first event"
            );
        }
    }

    #[test]
    fn merges_conserve_counters(
        doc in arb_document(),
        merges in proptest::collection::vec(proptest::collection::vec(arb_id(), 0..4), 1..6),
    ) {
        let ops: Vec<_> = merges
            .iter()
            .enumerate()
            .map(|(i, ids)| {
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                merge_op(&ids, &format!("merged {i}"), None)
            })
            .collect();
        let outcome = apply_atomic(&doc, &ops, &CuratorConfig::default(), NullSink);
        prop_assert_eq!(counter_totals(outcome.document()), counter_totals(&doc));
    }

    #[test]
    fn pruning_matches_rule(doc in arb_document(), min_harmful in 1u64..5) {
        let config = PruneConfig::new().with_min_harmful(min_harmful);
        let mut pruned = doc.clone();
        let report = prune(&mut pruned, &config);

        for (_, entry) in pruned.iter() {
            prop_assert!(!should_prune(entry, &config));
        }
        for (_, entry) in &report.removed {
            prop_assert!(entry.harmful >= min_harmful && entry.harmful > entry.helpful);
        }
        prop_assert_eq!(pruned.len() + report.len(), doc.len());
    }

    #[test]
    fn untouched_entries_are_never_pruned(helpful in 0u64..100) {
        let entry = Entry::with_counts("oth-001", "t", helpful, 0);
        prop_assert!(!should_prune(&entry, &PruneConfig::default()));
    }
}

#[test]
fn pruning_floor_examples() {
    let mut doc = Document::from_sections([(
        Section::Others,
        vec![
            Entry::with_counts("oth-001", "fresh", 0, 0),
            Entry::with_counts("oth-002", "mostly good", 10, 4),
            Entry::with_counts("oth-003", "mostly bad", 1, 4),
            Entry::with_counts("oth-004", "tied", 3, 3),
        ],
    )])
    .unwrap();
    let report = prune(&mut doc, &PruneConfig::default());
    assert_eq!(report.ids().collect::<Vec<_>>(), ["oth-003"]);
    assert_eq!(doc.len(), 3);
}
