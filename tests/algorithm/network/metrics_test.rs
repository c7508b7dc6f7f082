//! Tests for per-window member metrics

use affil_net::algorithm::network::{
    Edge, EdgeLabels, EdgeList, GraphView, MetricsEngine, MetricsRow, z_scores,
};

use crate::utils::{date, names};

fn edges(pairs: &[(&str, &str)]) -> EdgeList {
    EdgeList::Edges(pairs.iter().map(|(a, b)| Edge::new(*a, *b, 1.0, 0)).collect())
}

fn compute(edges: &EdgeList, members: &[&str]) -> Vec<MetricsRow> {
    MetricsEngine::new(false).compute(edges, &names(members), date(2020, 1, 1), date(2020, 2, 1))
}

fn assert_all_na(row: &MetricsRow) {
    assert!(row.centrality.is_none());
    assert!(row.degree.is_none());
    assert!(row.centrality_normalized.is_none());
    assert!(row.degree_normalized.is_none());
    assert!(row.centrality_rank.is_none());
    assert!(row.degree_rank.is_none());
}

#[test]
fn test_empty_graph_gives_all_na_rows() {
    let rows = compute(&EdgeList::EmptyGraph, &["A", "B", "C"]);

    assert_eq!(rows.len(), 3);
    rows.iter().for_each(assert_all_na);
    assert_eq!(rows[2].member_id, "C");
    assert_eq!(rows[0].start_date, date(2020, 1, 1));
    assert_eq!(rows[0].end_date, date(2020, 2, 1));
}

#[test]
fn test_normalization_of_two_four_six() {
    assert_eq!(
        z_scores(&[Some(2.0), Some(4.0), Some(6.0)]),
        vec![Some(-1.0), Some(0.0), Some(1.0)]
    );

    // Degrees A=2, B=4, C=6 among the requested members
    let graph = edges(&[
        ("A", "B"),
        ("A", "C"),
        ("B", "C"),
        ("B", "D"),
        ("B", "E"),
        ("C", "D"),
        ("C", "E"),
        ("C", "F"),
        ("C", "G"),
    ]);
    let rows = compute(&graph, &["A", "B", "C"]);

    let degrees: Vec<_> = rows.iter().map(|r| r.degree).collect();
    assert_eq!(degrees, vec![Some(2.0), Some(4.0), Some(6.0)]);
    let normalized: Vec<_> = rows.iter().map(|r| r.degree_normalized).collect();
    assert_eq!(normalized, vec![Some(-1.0), Some(0.0), Some(1.0)]);
    let ranks: Vec<_> = rows.iter().map(|r| r.degree_rank).collect();
    assert_eq!(ranks, vec![Some(3), Some(2), Some(1)]);
}

#[test]
fn test_ranks_are_permutations_without_gaps() {
    let graph = edges(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A"), ("A", "C")]);
    // "Z" is not in the graph and must not take a rank
    let rows = compute(&graph, &["D", "Z", "C", "B", "A"]);

    let valid: Vec<&MetricsRow> = rows.iter().filter(|r| r.is_valid()).collect();
    assert_eq!(valid.len(), 4);

    for ranks in [
        valid.iter().map(|r| r.degree_rank.unwrap()).collect::<Vec<_>>(),
        valid.iter().map(|r| r.centrality_rank.unwrap()).collect::<Vec<_>>(),
    ] {
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
    }

    assert_all_na(&rows[1]);
}

#[test]
fn test_star_betweenness() {
    let graph = edges(&[("H", "A"), ("H", "B"), ("H", "C")]);
    let rows = compute(&graph, &["H", "A", "B", "C"]);

    assert_eq!(rows[0].centrality, Some(3.0));
    assert_eq!(rows[0].degree, Some(3.0));
    assert_eq!(rows[0].centrality_rank, Some(1));
    for row in &rows[1..] {
        assert_eq!(row.centrality, Some(0.0));
        assert_eq!(row.degree, Some(1.0));
    }
}

#[test]
fn test_reversed_pair_is_the_same_vertex_pair() {
    let reversed = Edge {
        from: "B".to_string(),
        to: "A".to_string(),
        weight: 1.0,
        labels: EdgeLabels::new(),
        key_set: 0,
    };
    let view = GraphView::from_edges(&[Edge::new("A", "B", 1.0, 0), reversed.clone()]);
    assert_eq!(view.node_count, 2);
    assert_eq!(view.pair_count(), 1);

    // A path through B is unaffected by the orientation of its edges
    let canonical = compute(&edges(&[("A", "B"), ("B", "C")]), &["A", "B", "C"]);
    let mixed = compute(
        &EdgeList::Edges(vec![reversed, Edge::new("C", "B", 1.0, 0)]),
        &["A", "B", "C"],
    );
    assert_eq!(canonical, mixed);
    assert_eq!(canonical[1].centrality, Some(1.0));
}

#[test]
fn test_weighted_degree_is_strength() {
    let graph = EdgeList::Edges(vec![Edge::new("A", "B", 2.5, 0), Edge::new("B", "C", 0.5, 0)]);
    let rows = MetricsEngine::new(true).compute(
        &graph,
        &names(&["A", "B", "C"]),
        date(2020, 1, 1),
        date(2020, 2, 1),
    );

    assert_eq!(rows[1].degree, Some(3.0));
    assert_eq!(rows[0].degree, Some(2.5));
}
