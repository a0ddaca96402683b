//! Property-based tests for name similarity and graph construction.

use std::collections::HashSet;

use proptest::prelude::*;

use arxiv_graph::builder::GraphBuilder;
use arxiv_graph::graph::{BipartiteGraph, Partition};
use arxiv_graph::models::Record;
use arxiv_graph::similarity::{SequenceMatcher, get_close_matches};

/// Author names share no characters with paper ids, so a name can never
/// resolve to a paper node.
fn arb_name() -> impl Strategy<Value = String> {
    ("[A-Z][a-z]{2,8}", "[A-Z][a-z]{2,8}").prop_map(|(first, last)| format!("{first} {last}"))
}

fn arb_record() -> impl Strategy<Value = Record> {
    ("[0-9]{4}\\.[0-9]{5}", proptest::collection::vec(arb_name(), 0..4)).prop_map(
        |(id, authors)| Record {
            title: format!("On {id}"),
            summary: "Abstract".to_string(),
            id,
            published: None,
            authors,
        },
    )
}

fn build(builder: &GraphBuilder, records: &[Record]) -> (BipartiteGraph, usize) {
    let mut graph = BipartiteGraph::new();
    let edges_added = records.iter().map(|r| builder.ingest(r, &mut graph).edges_added).sum();
    (graph, edges_added)
}

proptest! {
    /// Ratio and its cheap upper bounds stay ordered and within [0, 1].
    #[test]
    fn ratio_bounded_by_quick_ratios(a in "[a-e ]{0,40}", b in "[a-e ]{0,40}") {
        let matcher = SequenceMatcher::new(&a, &b);
        let (ratio, quick, real_quick) =
            (matcher.ratio(), matcher.quick_ratio(), matcher.real_quick_ratio());

        prop_assert!((0.0..=1.0).contains(&ratio));
        prop_assert!(ratio <= quick);
        prop_assert!(quick <= real_quick);
        prop_assert!(real_quick <= 1.0);
    }

    /// Any string is a perfect match for itself.
    #[test]
    fn identical_strings_score_one(s in "\\PC{1,60}") {
        let ratio = SequenceMatcher::new(&s, &s).ratio();
        prop_assert!((ratio - 1.0).abs() < f64::EPSILON);
    }

    /// Close matches respect `n` and `cutoff` and come best first.
    #[test]
    fn close_matches_sorted_and_bounded(
        word in "[a-d]{1,8}",
        candidates in proptest::collection::vec("[a-d]{1,8}", 0..12),
        n in 1usize..5,
        cutoff in 0.0f64..=1.0,
    ) {
        let matches = get_close_matches(&word, candidates.iter().map(String::as_str), n, cutoff);

        prop_assert!(matches.len() <= n);
        let scores: Vec<f64> =
            matches.iter().map(|m| SequenceMatcher::new(m, &word).ratio()).collect();
        for score in &scores {
            prop_assert!(*score >= cutoff);
        }
        for pair in scores.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }

    /// Every edge joins one paper and one author, and only authored records become papers.
    #[test]
    fn graph_stays_bipartite(
        records in proptest::collection::vec(arb_record(), 0..12),
        cutoff in 0.5f64..=1.0,
    ) {
        let (graph, edges_added) = build(&GraphBuilder::new(cutoff), &records);

        let paper_ids: HashSet<&str> =
            records.iter().filter(|r| r.has_authors()).map(|r| r.id.as_str()).collect();
        prop_assert_eq!(graph.count(Partition::Paper), paper_ids.len());
        prop_assert_eq!(
            graph.node_count(),
            graph.count(Partition::Paper) + graph.count(Partition::Author)
        );

        prop_assert_eq!(graph.edge_count(), edges_added);
        let listed: usize = records.iter().map(|r| r.authors.len()).sum();
        prop_assert!(graph.edge_count() <= listed);

        for (author, paper) in graph.edges() {
            prop_assert_eq!(graph.partition(author), Some(Partition::Author));
            prop_assert_eq!(graph.partition(paper), Some(Partition::Paper));
        }
    }

    /// With an exact-match cutoff, authors and edges are exactly the distinct names and pairs.
    #[test]
    fn exact_cutoff_keeps_every_distinct_name(
        records in proptest::collection::vec(arb_record(), 0..12),
    ) {
        let builder = GraphBuilder::new(1.0);
        let (graph, _) = build(&builder, &records);

        let names: HashSet<&str> =
            records.iter().flat_map(|r| r.authors.iter().map(String::as_str)).collect();
        let pairs: HashSet<(&str, &str)> = records
            .iter()
            .flat_map(|r| r.authors.iter().map(move |a| (a.as_str(), r.id.as_str())))
            .collect();

        prop_assert_eq!(graph.count(Partition::Author), names.len());
        prop_assert_eq!(graph.edge_count(), pairs.len());
    }

    /// Ingesting the same records again changes nothing under an exact-match cutoff.
    #[test]
    fn reingest_is_idempotent(records in proptest::collection::vec(arb_record(), 0..8)) {
        let builder = GraphBuilder::new(1.0);
        let (mut graph, _) = build(&builder, &records);
        let (nodes, edges) = (graph.node_count(), graph.edge_count());

        for record in &records {
            let outcome = builder.ingest(record, &mut graph);
            prop_assert!(!outcome.paper_added);
            prop_assert_eq!(outcome.edges_added, 0);
        }

        prop_assert_eq!(graph.node_count(), nodes);
        prop_assert_eq!(graph.edge_count(), edges);
    }
}
