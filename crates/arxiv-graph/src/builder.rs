//! Incremental graph construction with fuzzy author-identity resolution.
//!
//! Each record adds one paper node and links every listed author to it. Author
//! names are NFKD-normalised and then matched against every key already in the
//! graph with [`crate::similarity`]; a match at or above the cutoff reuses the
//! existing key, otherwise the normalised name becomes a new author key.
//!
//! Known defect: the candidate pool is all node keys, papers included. A name
//! that happens to resemble a paper identifier is attached to that paper node,
//! which keeps its `paper` tag. This is logged at warn level when it happens.

use unicode_normalization::UnicodeNormalization;

use crate::config::api;
use crate::graph::{BipartiteGraph, Partition};
use crate::models::Record;
use crate::similarity::closest_match;

/// What one [`GraphBuilder::ingest`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// A paper node was created.
    pub paper_added: bool,
    /// Author nodes created.
    pub authors_added: usize,
    /// Author names resolved to an existing key.
    pub authors_merged: usize,
    /// Edges created.
    pub edges_added: usize,
}

/// Folds records into a [`BipartiteGraph`].
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    cutoff: f64,
}

impl GraphBuilder {
    /// Create a builder merging names that score at least `cutoff`.
    #[must_use]
    pub const fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }

    /// Similarity cutoff in use.
    #[must_use]
    pub const fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Add `record` to `graph`.
    ///
    /// Records without authors are ignored entirely. A paper id seen before is
    /// not re-inserted, but its authors are still resolved and linked; links
    /// that already exist are not duplicated.
    pub fn ingest(&self, record: &Record, graph: &mut BipartiteGraph) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();
        if !record.has_authors() {
            tracing::trace!(paper = %record.id, "Skipping record without authors");
            return outcome;
        }

        outcome.paper_added = graph.add_paper(
            &record.id,
            normalize(&record.title),
            normalize(&record.summary),
            record.published,
        );

        for author in &record.authors {
            let name = normalize(author);
            let key = self.resolve(&name, graph);

            if key == name {
                if graph.add_author(&key) {
                    outcome.authors_added += 1;
                }
            } else {
                outcome.authors_merged += 1;
                tracing::debug!(name = %name, canonical = %key, "Merged author name");
            }

            if graph.partition(&key) == Some(Partition::Paper) {
                tracing::warn!(
                    author = %name,
                    matched = %key,
                    paper = %record.id,
                    "Author name resolved to a paper node"
                );
            }

            if graph.link(&key, &record.id) {
                outcome.edges_added += 1;
            }
        }

        outcome
    }

    /// Canonical key for an already-normalised author name.
    ///
    /// The closest existing key scoring at least the cutoff, or `name` itself.
    #[must_use]
    pub fn resolve(&self, name: &str, graph: &BipartiteGraph) -> String {
        closest_match(name, graph.keys(), self.cutoff).unwrap_or(name).to_string()
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(api::SIMILARITY_CUTOFF)
    }
}

/// Compatibility decomposition (NFKD) of `text`.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.nfkd().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, authors: &[&str]) -> Record {
        Record {
            id: id.to_string(),
            title: format!("Paper {id}"),
            summary: "Abstract".to_string(),
            published: None,
            authors: authors.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_authorless_record_is_ignored() {
        let mut g = BipartiteGraph::new();
        let outcome = GraphBuilder::default().ingest(&record("1901.00001", &[]), &mut g);

        assert_eq!(outcome, IngestOutcome::default());
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_one_paper_and_one_edge_per_author() {
        let mut g = BipartiteGraph::new();
        let outcome = GraphBuilder::default()
            .ingest(&record("1901.00001", &["Jane Q Doe", "Zhang Wei"]), &mut g);

        assert!(outcome.paper_added);
        assert_eq!(outcome.authors_added, 2);
        assert_eq!(outcome.edges_added, 2);
        assert_eq!(g.count(Partition::Paper), 1);
        assert_eq!(g.count(Partition::Author), 2);
        assert!(g.has_edge("Jane Q Doe", "1901.00001"));
        assert!(g.has_edge("Zhang Wei", "1901.00001"));
    }

    #[test]
    fn test_reingesting_record_is_idempotent() {
        let mut g = BipartiteGraph::new();
        let builder = GraphBuilder::default();
        let r = record("1901.00001", &["Jane Q Doe", "Zhang Wei"]);

        builder.ingest(&r, &mut g);
        let second = builder.ingest(&r, &mut g);

        assert!(!second.paper_added);
        assert_eq!(second.authors_added, 0);
        assert_eq!(second.edges_added, 0);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_near_duplicate_name_reuses_existing_node() {
        let mut g = BipartiteGraph::new();
        let builder = GraphBuilder::default();

        builder.ingest(&record("1901.00001", &["Jane Q Doe"]), &mut g);
        let outcome = builder.ingest(&record("1901.00002", &["Jane Q. Doe"]), &mut g);

        assert_eq!(outcome.authors_added, 0);
        assert_eq!(outcome.authors_merged, 1);
        assert!(!g.contains("Jane Q. Doe"));
        assert!(g.has_edge("Jane Q Doe", "1901.00002"));
    }

    #[test]
    fn test_dissimilar_name_creates_new_node() {
        let mut g = BipartiteGraph::new();
        let builder = GraphBuilder::default();

        builder.ingest(&record("1901.00001", &["Jane Q Doe"]), &mut g);
        builder.ingest(&record("1901.00002", &["Zhang Wei"]), &mut g);

        assert_eq!(g.count(Partition::Author), 2);
        assert!(g.contains("Zhang Wei"));
    }

    #[test]
    fn test_names_are_nfkd_normalised() {
        let mut g = BipartiteGraph::new();
        // Precomposed U+00FC
        GraphBuilder::default().ingest(&record("1901.00001", &["J\u{fc}rgen M\u{fc}ller"]), &mut g);

        assert!(g.contains("Ju\u{308}rgen Mu\u{308}ller"));
        assert!(!g.contains("J\u{fc}rgen M\u{fc}ller"));
    }

    #[test]
    fn test_paper_text_is_normalised() {
        let mut g = BipartiteGraph::new();
        let mut r = record("1901.00001", &["Ada"]);
        r.title = "\u{fb01}nite fields".to_string(); // "fi" ligature

        GraphBuilder::default().ingest(&r, &mut g);

        match &g.node("1901.00001").unwrap().data {
            crate::graph::NodeData::Paper { title, .. } => assert_eq!(title, "finite fields"),
            crate::graph::NodeData::Author => panic!("expected paper"),
        }
    }

    #[test]
    fn test_name_resembling_paper_key_attaches_to_paper_node() {
        let mut g = BipartiteGraph::new();
        let builder = GraphBuilder::default();
        g.add_paper("Jane Doe", "Odd id".into(), String::new(), None);

        builder.ingest(&record("1901.00001", &["Jane Doe"]), &mut g);

        assert_eq!(g.partition("Jane Doe"), Some(Partition::Paper));
        assert!(g.has_edge("Jane Doe", "1901.00001"));
        assert_eq!(g.count(Partition::Author), 0);
    }

    #[test]
    fn test_score_equal_to_cutoff_merges() {
        // 2 * 3 matched chars / 10 total chars
        let score = crate::similarity::SequenceMatcher::new("abcxyzw", "abc").ratio();
        assert!((score - 0.6).abs() < f64::EPSILON);

        let mut g = BipartiteGraph::new();
        let builder = GraphBuilder::new(0.6);
        builder.ingest(&record("1901.00001", &["abcxyzw"]), &mut g);
        let outcome = builder.ingest(&record("1901.00002", &["abc"]), &mut g);

        assert_eq!(outcome.authors_merged, 1);
        assert_eq!(g.count(Partition::Author), 1);
        assert!(g.has_edge("abcxyzw", "1901.00002"));
    }

    #[test]
    fn test_score_just_below_cutoff_creates_new_node() {
        let mut g = BipartiteGraph::new();
        let builder = GraphBuilder::new(0.61);
        builder.ingest(&record("1901.00001", &["abcxyzw"]), &mut g);
        let outcome = builder.ingest(&record("1901.00002", &["abc"]), &mut g);

        assert_eq!(outcome.authors_added, 1);
        assert_eq!(g.count(Partition::Author), 2);
        assert!(g.has_edge("abc", "1901.00002"));
    }

    #[test]
    fn test_cutoff_one_only_merges_exact_names() {
        let mut g = BipartiteGraph::new();
        let builder = GraphBuilder::new(1.0);

        builder.ingest(&record("1901.00001", &["Jane Q Doe"]), &mut g);
        builder.ingest(&record("1901.00002", &["Jane Q. Doe", "Jane Q Doe"]), &mut g);

        assert!(g.contains("Jane Q. Doe"));
        assert_eq!(g.count(Partition::Author), 2);
        assert!(g.has_edge("Jane Q Doe", "1901.00002"));
    }
}
