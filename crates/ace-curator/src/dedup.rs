//! Near-duplicate consolidation
//!
//! Entries whose pairwise similarity reaches the threshold are grouped,
//! transitively, and each group is folded into its first member in document
//! order. The survivor keeps its id, text and section; the counters of the
//! whole group are summed into it. Scoring goes through [`Similarity`] so the
//! embedding model lives outside this crate.
//!
//! The merge plan is computed in full before the document is touched, so a
//! scoring failure or an overflowing sum leaves the document as it was.

use crate::config::DedupConfig;
use crate::error::CurateError;
use ace_playbook::{Document, Entry, Section};
use serde::Serialize;

/// Source of pairwise text similarity
pub trait Similarity {
    /// Square score matrix for `texts`, where `scores[i][j]` compares
    /// `texts[i]` with `texts[j]`
    ///
    /// # Errors
    /// Returns [`CurateError::Similarity`] when scoring is unavailable
    fn scores(&mut self, texts: &[&str]) -> Result<Vec<Vec<f64>>, CurateError>;
}

impl<S: Similarity + ?Sized> Similarity for &mut S {
    fn scores(&mut self, texts: &[&str]) -> Result<Vec<Vec<f64>>, CurateError> {
        (**self).scores(texts)
    }
}

/// [`Similarity`] built from a pairwise scoring function
#[derive(Debug, Clone, Copy)]
pub struct Pairwise<F>(pub F);

impl<F> Similarity for Pairwise<F>
where
    F: FnMut(&str, &str) -> f64,
{
    fn scores(&mut self, texts: &[&str]) -> Result<Vec<Vec<f64>>, CurateError> {
        let mut matrix = Vec::with_capacity(texts.len());
        for &a in texts {
            let mut row = Vec::with_capacity(texts.len());
            for &b in texts {
                row.push((self.0)(a, b));
            }
            matrix.push(row);
        }
        Ok(matrix)
    }
}

/// One group of duplicates folded into its survivor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupGroup {
    /// Surviving entry id
    pub survivor: String,
    /// Section the survivor stays in
    pub section: Section,
    /// Ids removed into the survivor, in document order
    pub absorbed: Vec<String>,
    /// Summed helpful count
    pub helpful: u64,
    /// Summed harmful count
    pub harmful: u64,
}

/// Groups merged by one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    /// Merged groups, ordered by survivor position
    pub groups: Vec<DedupGroup>,
}

impl DedupReport {
    /// Number of entries removed
    #[must_use]
    pub fn absorbed_count(&self) -> usize {
        self.groups.iter().map(|group| group.absorbed.len()).sum()
    }

    /// Check if nothing was merged
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Fold near-duplicate entries into their first occurrence
///
/// Documents with fewer than two entries are returned untouched without
/// calling the scorer.
///
/// # Errors
/// Returns [`CurateError::Similarity`] if scoring fails or the matrix is not
/// `n x n`, and [`CurateError::CounterOverflow`] if a group sum overflows.
/// The document is unchanged in both cases.
pub fn deduplicate(
    document: &mut Document,
    similarity: &mut dyn Similarity,
    config: &DedupConfig,
) -> Result<DedupReport, CurateError> {
    if document.len() < 2 {
        return Ok(DedupReport::default());
    }
    let threshold = config.effective_threshold();

    let groups = {
        let entries: Vec<(Section, &Entry)> = document.iter().collect();
        let texts: Vec<&str> = entries.iter().map(|(_, entry)| entry.text.as_str()).collect();
        let scores = similarity.scores(&texts)?;
        if scores.len() != texts.len() || scores.iter().any(|row| row.len() != texts.len()) {
            return Err(CurateError::similarity(format!(
                "expected a {n}x{n} score matrix",
                n = texts.len()
            )));
        }
        connected_groups(&scores, threshold)
            .into_iter()
            .map(|members| fold_group(&entries, &members))
            .collect::<Result<Vec<_>, _>>()?
    };

    for group in &groups {
        for id in &group.absorbed {
            document.remove(id);
        }
        if let Some(survivor) = document.get_mut(&group.survivor) {
            survivor.helpful = group.helpful;
            survivor.harmful = group.harmful;
        }
        tracing::info!(
            "Merged {} duplicates into {} (helpful={}, harmful={})",
            group.absorbed.len(),
            group.survivor,
            group.helpful,
            group.harmful
        );
    }

    Ok(DedupReport { groups })
}

/// Indices of every multi-member component, each sorted ascending
fn connected_groups(scores: &[Vec<f64>], threshold: f64) -> Vec<Vec<usize>> {
    let n = scores.len();
    let linked = |i: usize, j: usize| i != j && scores[i.min(j)][i.max(j)] >= threshold;

    let mut assigned = vec![false; n];
    let mut groups = Vec::new();
    for start in 0..n {
        if assigned[start] {
            continue;
        }
        assigned[start] = true;
        let mut members = vec![start];
        let mut pending = vec![start];
        while let Some(i) = pending.pop() {
            for j in 0..n {
                if !assigned[j] && linked(i, j) {
                    assigned[j] = true;
                    members.push(j);
                    pending.push(j);
                }
            }
        }
        if members.len() > 1 {
            members.sort_unstable();
            groups.push(members);
        }
    }
    groups
}

fn fold_group(entries: &[(Section, &Entry)], members: &[usize]) -> Result<DedupGroup, CurateError> {
    let (section, survivor) = entries[members[0]];
    let overflow = || CurateError::CounterOverflow {
        id: survivor.id.clone(),
    };

    let (mut helpful, mut harmful) = (0_u64, 0_u64);
    for &index in members {
        let (_, entry) = entries[index];
        helpful = helpful.checked_add(entry.helpful).ok_or_else(overflow)?;
        harmful = harmful.checked_add(entry.harmful).ok_or_else(overflow)?;
    }

    Ok(DedupGroup {
        survivor: survivor.id.clone(),
        section,
        absorbed: members[1..]
            .iter()
            .map(|&index| entries[index].1.id.clone())
            .collect(),
        helpful,
        harmful,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Scores from an explicit list of similar text pairs; everything else is 0
    fn pairs(similar: &'static [(&'static str, &'static str, f64)]) -> Pairwise<impl FnMut(&str, &str) -> f64> {
        Pairwise(move |a: &str, b: &str| {
            if a == b {
                return 1.0;
            }
            similar
                .iter()
                .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
                .map_or(0.0, |(_, _, score)| *score)
        })
    }

    fn config() -> DedupConfig {
        DedupConfig::default()
    }

    #[test]
    fn first_entry_wins_and_counters_sum() {
        let mut doc = Document::from_sections([(
            Section::Patterns,
            vec![
                Entry::with_counts("pat-001", "always use type hints", 5, 0),
                Entry::with_counts("pat-002", "use type hints on all params", 3, 1),
            ],
        )])
        .unwrap();
        let mut scorer = pairs(&[("always use type hints", "use type hints on all params", 1.0)]);
        let report = deduplicate(&mut doc, &mut scorer, &config()).unwrap();

        assert_eq!(
            doc.entries(Section::Patterns),
            [Entry::with_counts("pat-001", "always use type hints", 8, 1)]
        );
        assert_eq!(report.absorbed_count(), 1);
        assert_eq!(report.groups[0].absorbed, ["pat-002"]);
    }

    #[test]
    fn cross_section_survivor_keeps_its_section() {
        let mut doc = Document::from_sections([
            (Section::Patterns, vec![Entry::with_counts("pat-001", "avoid any", 4, 0)]),
            (Section::Mistakes, vec![Entry::with_counts("mis-001", "don't use any", 2, 1)]),
        ])
        .unwrap();
        let mut scorer = pairs(&[("avoid any", "don't use any", 0.95)]);
        let report = deduplicate(&mut doc, &mut scorer, &config()).unwrap();

        assert!(doc.entries(Section::Mistakes).is_empty());
        assert_eq!(doc.get("pat-001").map(|e| (e.helpful, e.harmful)), Some((6, 1)));
        assert_eq!(report.groups[0].section, Section::Patterns);
    }

    #[test]
    fn grouping_is_transitive() {
        let mut doc = Document::from_sections([(
            Section::Patterns,
            vec![
                Entry::with_counts("pat-001", "A", 1, 0),
                Entry::with_counts("pat-002", "B", 2, 0),
                Entry::with_counts("pat-003", "C", 3, 0),
            ],
        )])
        .unwrap();
        let mut scorer = pairs(&[("A", "B", 0.90), ("B", "C", 0.88), ("A", "C", 0.60)]);
        deduplicate(&mut doc, &mut scorer, &config()).unwrap();

        assert_eq!(
            doc.entries(Section::Patterns),
            [Entry::with_counts("pat-001", "A", 6, 0)]
        );
    }

    #[test]
    fn independent_groups_merge_separately() {
        let mut doc = Document::from_sections([(
            Section::Patterns,
            vec![
                Entry::with_counts("pat-001", "a1", 1, 0),
                Entry::with_counts("pat-002", "a2", 2, 0),
                Entry::with_counts("pat-003", "b1", 3, 0),
                Entry::with_counts("pat-004", "b2", 4, 0),
            ],
        )])
        .unwrap();
        let mut scorer = pairs(&[("a1", "a2", 1.0), ("b1", "b2", 1.0)]);
        let report = deduplicate(&mut doc, &mut scorer, &config()).unwrap();

        let survivors: Vec<_> = report.groups.iter().map(|g| (g.survivor.as_str(), g.helpful)).collect();
        assert_eq!(survivors, [("pat-001", 3), ("pat-003", 7)]);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn below_threshold_is_kept() {
        let mut doc = Document::from_sections([(
            Section::Patterns,
            vec![Entry::new("pat-001", "x"), Entry::new("pat-002", "y")],
        )])
        .unwrap();
        let before = doc.clone();
        let mut scorer = pairs(&[("x", "y", 0.87)]);
        let report = deduplicate(&mut doc, &mut scorer, &config().with_threshold(0.90)).unwrap();
        assert!(report.is_empty());
        assert_eq!(doc, before);
    }

    #[test]
    fn threshold_above_one_is_clamped() {
        let mut doc = Document::from_sections([(
            Section::Patterns,
            vec![Entry::new("pat-001", "x"), Entry::new("pat-002", "y")],
        )])
        .unwrap();
        let mut identical = pairs(&[("x", "y", 1.0)]);
        let report = deduplicate(&mut doc, &mut identical, &config().with_threshold(2.0)).unwrap();
        assert_eq!(report.absorbed_count(), 1);
    }

    #[test]
    fn small_documents_skip_scoring() {
        let mut doc = Document::from_sections([(Section::Others, vec![Entry::new("oth-001", "only")])]).unwrap();
        let mut scorer = Pairwise(|_: &str, _: &str| -> f64 { panic!("must not score") });
        assert!(deduplicate(&mut doc, &mut scorer, &config()).unwrap().is_empty());
    }

    struct Unavailable;

    impl Similarity for Unavailable {
        fn scores(&mut self, _: &[&str]) -> Result<Vec<Vec<f64>>, CurateError> {
            Err(CurateError::similarity("model not loaded"))
        }
    }

    #[test]
    fn scorer_failure_leaves_document() {
        let mut doc = Document::from_sections([(
            Section::Patterns,
            vec![Entry::new("pat-001", "x"), Entry::new("pat-002", "y")],
        )])
        .unwrap();
        let before = doc.clone();
        let err = deduplicate(&mut doc, &mut Unavailable, &config()).unwrap_err();
        assert_eq!(err, CurateError::similarity("model not loaded"));
        assert_eq!(doc, before);
    }

    #[test]
    fn overflowing_sum_leaves_document() {
        let mut doc = Document::from_sections([(
            Section::Others,
            vec![
                Entry::with_counts("oth-001", "x", u64::MAX, 0),
                Entry::with_counts("oth-002", "y", 1, 0),
            ],
        )])
        .unwrap();
        let before = doc.clone();
        let mut scorer = pairs(&[("x", "y", 1.0)]);
        let err = deduplicate(&mut doc, &mut scorer, &config()).unwrap_err();
        assert_eq!(err, CurateError::CounterOverflow { id: "oth-001".into() });
        assert_eq!(doc, before);
    }

    #[test]
    fn malformed_matrix_is_rejected() {
        struct Short;
        impl Similarity for Short {
            fn scores(&mut self, _: &[&str]) -> Result<Vec<Vec<f64>>, CurateError> {
                Ok(vec![vec![1.0]])
            }
        }
        let mut doc = Document::from_sections([(
            Section::Patterns,
            vec![Entry::new("pat-001", "x"), Entry::new("pat-002", "y")],
        )])
        .unwrap();
        assert!(matches!(
            deduplicate(&mut doc, &mut Short, &config()),
            Err(CurateError::Similarity(_))
        ));
    }
}
