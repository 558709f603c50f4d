//! End-to-end batch behavior through the atomic entry point.

use ace_curator::{
    apply_atomic, apply_atomic_with, apply_batch, Batch, CurateError, CurationEvent,
    CuratorConfig, NullSink, OperationKind, RecordingSink,
};
use ace_playbook::{generate_id, Document, Entry, Section};
use ace_test_utils::{
    add_op, delete_op, distinct_adds, merge_op, sample_document, unknown_op, update_op,
    DocumentBuilder,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn config() -> CuratorConfig {
    CuratorConfig::default()
}

#[test]
fn atomicity_commit_shares_nothing_with_original() {
    let original = sample_document();
    let outcome = apply_atomic(
        &original,
        &[update_op("pat-001", "use type hints everywhere")],
        &config(),
        NullSink,
    );
    let mut adopted = outcome.into_document().into_owned();
    assert_eq!(adopted.get("pat-001").unwrap().text, "use type hints everywhere");
    assert_eq!(original.get("pat-001").unwrap().text, "use type hints");

    adopted.remove("pat-002");
    assert!(original.contains_id("pat-002"));
}

#[test]
fn atomicity_injected_defect_restores_original() {
    let original = sample_document();
    let mut sink = RecordingSink::new();
    let batch = Batch::from_raw(
        &[delete_op("pat-001", None), add_op("new tip", None)],
        10,
    );
    let outcome = apply_atomic_with(&original, batch, &config(), &mut sink, |doc, batch, cfg| {
        let (_mutated, _report) = apply_batch(doc, batch, cfg)?;
        Err(CurateError::engine("disk on fire"))
    });

    assert!(outcome.is_rolled_back());
    assert_eq!(outcome.document(), &sample_document());
    assert!(std::ptr::eq(outcome.document(), &original));
    assert!(sink.events().is_empty());
}

#[test]
fn atomicity_natural_defect_rolls_back_earlier_operations() {
    // `pat-001` lives in OTHERS, so the next PATTERNS id collides with it.
    let original = DocumentBuilder::new()
        .entry(Section::Others, "pat-001", "misfiled")
        .entry(Section::Others, "oth-001", "keep me")
        .build();
    let outcome = apply_atomic(
        &original,
        &[
            delete_op("oth-001", None),
            add_op("fresh pattern", Some("PATTERNS & APPROACHES")),
        ],
        &config(),
        NullSink,
    );
    assert_eq!(
        outcome.error(),
        Some(&CurateError::IdCollision {
            id: "pat-001".into()
        })
    );
    assert!(outcome.document().contains_id("oth-001"));
}

#[test]
fn skip_is_not_failure() {
    let original = sample_document();
    let batch = [
        json!({"type": "ADD", "text": "   "}),
        json!({"type": "UPDATE", "target_id": "pat-001"}),
        json!({"type": "MERGE", "source_ids": ["pat-001"], "merged_text": "x"}),
        json!({"type": "DELETE"}),
        json!({"type": "DELETE", "target_id": "nope"}),
        unknown_op("RENAME"),
        json!(null),
    ];
    let outcome = apply_atomic(&original, &batch, &config(), NullSink);

    let report = outcome.report().unwrap();
    assert_eq!(outcome.document(), &original);
    assert_eq!(report.summary.total_applied(), 0);
    assert_eq!(report.summary.total_skipped(), batch.len());
    assert_eq!(report.summary.unknown.skipped, 2);
    assert_eq!(report.summary.skip_reasons.len(), batch.len());
}

#[test]
fn forward_reference_to_entry_added_in_same_batch() {
    let original = sample_document();
    let outcome = apply_atomic(
        &original,
        &[
            add_op("always run clippy", Some("PATTERNS & APPROACHES")),
            merge_op(&["pat-003", "pat-001"], "lint and type-check", None),
        ],
        &config(),
        NullSink,
    );
    let doc = outcome.document();
    let report = outcome.report().unwrap();

    assert_eq!(report.summary.add.applied, 1);
    assert_eq!(report.summary.merge.applied, 1);
    assert!(!doc.contains_id("pat-001"));
    assert!(!doc.contains_id("pat-003"));
    assert_eq!(
        doc.get("pat-004"),
        Some(&Entry::with_counts("pat-004", "lint and type-check", 5, 1))
    );
}

#[test]
fn merge_sums_counters_of_live_sources() {
    let original = DocumentBuilder::new()
        .counted(Section::Mistakes, "mis-001", "a", 2, 7)
        .counted(Section::Mistakes, "mis-002", "b", 4, 0)
        .counted(Section::Context, "ctx-001", "c", 1, 3)
        .build();
    let outcome = apply_atomic(
        &original,
        &[merge_op(&["mis-002", "ghost", "ctx-001", "mis-001"], "abc", None)],
        &config(),
        NullSink,
    );
    let doc = outcome.document();
    assert_eq!(doc.len(), 1);
    assert_eq!(
        doc.entries(Section::Mistakes),
        [Entry::with_counts("mis-003", "abc", 7, 10)]
    );
}

#[test]
fn id_scoping_ignores_legacy_ids() {
    let entries = [Entry::new("oth-001", "a"), Entry::new("legacy_007", "b")];
    assert_eq!(generate_id(&entries, "oth"), "oth-002");
}

#[test]
fn truncation_boundary() {
    let empty = Document::new();

    let at_cap = apply_atomic(&empty, &distinct_adds(10), &config(), NullSink);
    assert_eq!(at_cap.document().len(), 10);
    let report = at_cap.report().unwrap();
    assert!(report.summary.truncation.is_none());
    assert_eq!(
        report
            .events_matching(|e| matches!(e, CurationEvent::Truncated { .. }))
            .count(),
        0
    );

    let mut sink = RecordingSink::new();
    let over = apply_atomic(&empty, &distinct_adds(11), &config(), &mut sink);
    assert_eq!(over.document().len(), 10);
    assert_eq!(
        sink.events()[0],
        CurationEvent::Truncated {
            original: 11,
            kept: 10
        }
    );
    let truncated = sink
        .events()
        .iter()
        .filter(|e| matches!(e, CurationEvent::Truncated { .. }))
        .count();
    assert_eq!(truncated, 1);
}

#[test]
fn delete_then_merge_on_deleted_id_skips_merge() {
    let original = DocumentBuilder::new()
        .counted(Section::Others, "a1", "X", 5, 1)
        .counted(Section::Others, "a2", "Y", 3, 0)
        .build();
    let outcome = apply_atomic(
        &original,
        &[delete_op("a1", None), merge_op(&["a1", "a2"], "Z", None)],
        &config(),
        NullSink,
    );
    let report = outcome.report().unwrap();

    assert_eq!(
        outcome.document().entries(Section::Others),
        [Entry::with_counts("a2", "Y", 3, 0)]
    );
    assert_eq!(report.summary.delete.applied, 1);
    assert_eq!(report.summary.merge.skipped, 1);
    assert!(report.events.contains(&CurationEvent::NonexistentReference {
        id: "a1".into(),
        operation: OperationKind::Merge,
    }));
}

#[test]
fn empty_batch_fast_path() {
    let original = sample_document();
    let outcome = apply_atomic(&original, &[], &config(), NullSink);
    assert!(outcome.is_fast_path());
    assert!(std::ptr::eq(outcome.document(), &original));
    assert!(outcome.report().is_none());
}

#[test]
fn duplicate_add_skipped_regardless_of_section() {
    let original = DocumentBuilder::new()
        .entry(Section::Preferences, "pref-001", "prefer X")
        .build();
    let outcome = apply_atomic(
        &original,
        &[add_op("prefer X", Some("OTHERS"))],
        &config(),
        NullSink,
    );
    let report = outcome.report().unwrap();
    assert_eq!(outcome.document(), &original);
    assert_eq!(report.summary.add.skipped, 1);
    assert!(report.summary.skip_reasons[0].contains("duplicate"));
}

#[test]
fn duplicate_check_is_case_sensitive() {
    let original = DocumentBuilder::new()
        .entry(Section::Others, "oth-001", "prefer X")
        .build();
    let outcome = apply_atomic(&original, &[add_op("Prefer X", None)], &config(), NullSink);
    assert_eq!(outcome.document().len(), 2);
}

#[test]
fn duplicate_within_same_batch() {
    let original = Document::new();
    let outcome = apply_atomic(
        &original,
        &[add_op("same", None), add_op("same", Some("MISTAKES TO AVOID"))],
        &config(),
        NullSink,
    );
    assert_eq!(outcome.document().len(), 1);
}

#[test]
fn audit_events_reach_sink_in_order() {
    let original = sample_document();
    let mut sink = RecordingSink::new();
    let _ = apply_atomic(
        &original,
        &[
            update_op("pat-002", "prefer pathlib over os.path"),
            delete_op("mis-001", Some("no longer relevant")),
            delete_op("mis-001", None),
        ],
        &config(),
        &mut sink,
    );
    let events = sink.into_events();
    assert_eq!(events.len(), 4);
    assert!(matches!(&events[0], CurationEvent::UpdateAudit { id, .. } if id == "pat-002"));
    assert_eq!(
        events[1],
        CurationEvent::DeleteAudit {
            id: "mis-001".into(),
            preview: "bare except hides bugs".into(),
            reason: Some("no longer relevant".into()),
        }
    );
    assert_eq!(
        events[2],
        CurationEvent::NonexistentReference {
            id: "mis-001".into(),
            operation: OperationKind::Delete,
        }
    );
    let CurationEvent::Summary(summary) = &events[3] else {
        panic!("summary must be last");
    };
    assert_eq!(summary.delete.applied, 1);
    assert_eq!(summary.delete.skipped, 1);
}

#[test]
fn delete_reason_is_never_stored() {
    let original = sample_document();
    let outcome = apply_atomic(
        &original,
        &[delete_op("pat-002", Some("SECRET-REASON"))],
        &config(),
        NullSink,
    );
    let json = serde_json::to_string(outcome.document()).unwrap();
    assert!(!json.contains("SECRET-REASON"));
}

#[test]
fn custom_cap_applies() {
    let original = Document::new();
    let outcome = apply_atomic(
        &original,
        &distinct_adds(5),
        &config().with_max_operations(2),
        NullSink,
    );
    assert_eq!(outcome.document().len(), 2);
    assert_eq!(
        outcome.report().unwrap().summary.truncation.map(|t| t.kept),
        Some(2)
    );
}

#[test]
fn raised_cap_cannot_exceed_hard_limit() {
    let mut sink = RecordingSink::new();
    let original = Document::new();
    let outcome = apply_atomic(
        &original,
        &distinct_adds(15),
        &config().with_max_operations(50),
        &mut sink,
    );
    assert_eq!(outcome.document().len(), 10);
    assert_eq!(
        sink.events()[0],
        CurationEvent::Truncated {
            original: 15,
            kept: 10
        }
    );
}

#[test]
fn zero_cap_still_reports_truncation() {
    let mut sink = RecordingSink::new();
    let original = Document::new();
    let outcome = apply_atomic(
        &original,
        &distinct_adds(3),
        &config().with_max_operations(0),
        &mut sink,
    );
    assert!(!outcome.is_fast_path());
    assert_eq!(outcome.document().len(), 1);
    assert_eq!(
        sink.events()[0],
        CurationEvent::Truncated {
            original: 3,
            kept: 1
        }
    );
}
