//! Betweenness centrality (Brandes' algorithm)
//!
//! Scores are raw pair-dependency sums for an undirected graph: each
//! unordered pair of endpoints contributes once, so a path graph `A-B-C`
//! gives `B` a score of 1. The weighted variant treats an adjacency's weight
//! as tie strength and uses `1 / weight` as its length.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::algorithm::network::graph::GraphView;

/// Relative tolerance when comparing weighted path lengths
const EPSILON: f64 = 1e-10;

/// State for the Dijkstra priority queue
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node_idx: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap, then by index for a stable pop order
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node_idx.cmp(&self.node_idx))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn same_length(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Single-source shortest-path structure consumed by the accumulation phase
struct ShortestPaths {
    /// Nodes in order of non-decreasing distance from the source
    order: Vec<usize>,
    /// Predecessors on shortest paths
    predecessors: Vec<Vec<usize>>,
    /// Number of shortest paths from the source
    sigma: Vec<f64>,
}

fn bfs_paths(view: &GraphView, source: usize) -> ShortestPaths {
    let n = view.node_count;
    let mut order = Vec::with_capacity(n);
    let mut predecessors = vec![Vec::new(); n];
    let mut sigma = vec![0.0; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];

    sigma[source] = 1.0;
    dist[source] = Some(0);
    let mut queue = VecDeque::from([source]);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        let dv = dist[v].unwrap_or_default();
        for &w in view.neighbors(v) {
            match dist[w] {
                None => {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
                Some(dw) if dw == dv + 1 => {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
                Some(_) => {}
            }
        }
    }

    ShortestPaths {
        order,
        predecessors,
        sigma,
    }
}

fn dijkstra_paths(view: &GraphView, source: usize) -> ShortestPaths {
    let n = view.node_count;
    let mut order = Vec::with_capacity(n);
    let mut predecessors = vec![Vec::new(); n];
    let mut sigma = vec![0.0; n];
    let mut dist: Vec<Option<f64>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    sigma[source] = 1.0;
    dist[source] = Some(0.0);
    heap.push(State {
        cost: 0.0,
        node_idx: source,
    });

    while let Some(State { cost, node_idx: v }) = heap.pop() {
        if settled[v] {
            continue;
        }
        settled[v] = true;
        order.push(v);

        for (&w, &weight) in view.neighbors(v).iter().zip(view.weights(v)) {
            if settled[w] || weight <= 0.0 {
                continue;
            }
            let alt = cost + 1.0 / weight;
            match dist[w] {
                Some(dw) if same_length(alt, dw) => {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
                Some(dw) if alt > dw => {}
                _ => {
                    dist[w] = Some(alt);
                    sigma[w] = sigma[v];
                    predecessors[w] = vec![v];
                    heap.push(State {
                        cost: alt,
                        node_idx: w,
                    });
                }
            }
        }
    }

    ShortestPaths {
        order,
        predecessors,
        sigma,
    }
}

fn accumulate(paths: &ShortestPaths, source: usize, scores: &mut [f64]) {
    let mut delta = vec![0.0; scores.len()];
    for &w in paths.order.iter().rev() {
        for &v in &paths.predecessors[w] {
            delta[v] += paths.sigma[v] / paths.sigma[w] * (1.0 + delta[w]);
        }
        if w != source {
            scores[w] += delta[w];
        }
    }
}

fn brandes(view: &GraphView, paths: impl Fn(&GraphView, usize) -> ShortestPaths) -> Vec<f64> {
    let mut scores = vec![0.0; view.node_count];
    for source in 0..view.node_count {
        let sp = paths(view, source);
        accumulate(&sp, source, &mut scores);
    }
    // Every unordered pair was counted from both endpoints
    scores.iter_mut().for_each(|s| *s /= 2.0);
    scores
}

/// Betweenness with hop-count path lengths, indexed like the view's nodes
#[must_use]
pub fn betweenness_unweighted(view: &GraphView) -> Vec<f64> {
    brandes(view, bfs_paths)
}

/// Betweenness with `1 / weight` path lengths, indexed like the view's nodes
///
/// Adjacencies with non-positive weight are not traversable.
#[must_use]
pub fn betweenness_weighted(view: &GraphView) -> Vec<f64> {
    brandes(view, dijkstra_paths)
}
