//! Undirected graph view over an edge list
//!
//! Provides a read-only, integer-indexed view of the graph topology for
//! metric computation, and the [`GraphBackend`] seam through which another
//! graph library could supply degree and betweenness instead.

use rustc_hash::FxHashMap;

use crate::algorithm::network::centrality::{betweenness_unweighted, betweenness_weighted};
use crate::algorithm::network::edges::Edge;

/// A dense, integer-indexed view of an undirected graph in Compressed Sparse Row format
///
/// Parallel edges and both orientations of a pair collapse into a single
/// adjacency whose weight is the sum of the edge weights.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to member id
    pub index_to_node: Vec<String>,
    /// Mapping from member id to dense index
    pub node_to_index: FxHashMap<String, usize>,
    /// Offsets into `neighbors`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor indices
    pub neighbors: Vec<usize>,
    /// Collapsed pair weights, aligned with `neighbors`
    pub weights: Vec<f64>,
    /// Number of edge-list edges incident to each node
    pub incident_edges: Vec<usize>,
}

impl GraphView {
    /// Build the view from an edge list
    ///
    /// Nodes are exactly the members appearing in `edges`, indexed in sorted
    /// order. Self-loops are ignored.
    #[must_use]
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut members: Vec<&str> = edges
            .iter()
            .filter(|e| e.from != e.to)
            .flat_map(|e| [e.from.as_str(), e.to.as_str()])
            .collect();
        members.sort_unstable();
        members.dedup();

        let node_count = members.len();
        let index_to_node: Vec<String> = members.iter().map(|m| (*m).to_string()).collect();
        let node_to_index: FxHashMap<String, usize> = index_to_node
            .iter()
            .enumerate()
            .map(|(i, m)| (m.clone(), i))
            .collect();

        let mut adjacency: Vec<FxHashMap<usize, f64>> = vec![FxHashMap::default(); node_count];
        let mut incident_edges = vec![0; node_count];
        for edge in edges.iter().filter(|e| e.from != e.to) {
            let a = node_to_index[&edge.from];
            let b = node_to_index[&edge.to];
            *adjacency[a].entry(b).or_insert(0.0) += edge.weight;
            *adjacency[b].entry(a).or_insert(0.0) += edge.weight;
            incident_edges[a] += 1;
            incident_edges[b] += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut neighbors = Vec::new();
        let mut weights = Vec::new();
        offsets.push(0);
        for row in adjacency {
            let mut row: Vec<(usize, f64)> = row.into_iter().collect();
            row.sort_unstable_by_key(|(idx, _)| *idx);
            for (idx, weight) in row {
                neighbors.push(idx);
                weights.push(weight);
            }
            offsets.push(neighbors.len());
        }

        Self {
            node_count,
            index_to_node,
            node_to_index,
            offsets,
            neighbors,
            weights,
            incident_edges,
        }
    }

    /// Get the neighbors of a node
    #[must_use]
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.neighbors[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Get the collapsed weights of a node's adjacencies, aligned with [`Self::neighbors`]
    #[must_use]
    pub fn weights(&self, idx: usize) -> &[f64] {
        &self.weights[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Number of distinct neighbors
    #[must_use]
    pub fn neighbor_count(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Sum of incident edge weights
    #[must_use]
    pub fn strength(&self, idx: usize) -> f64 {
        self.weights(idx).iter().sum()
    }

    /// Number of distinct vertex pairs
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.neighbors.len() / 2
    }

    /// Index of a member, if it is in the graph
    #[must_use]
    pub fn index_of(&self, member: &str) -> Option<usize> {
        self.node_to_index.get(member).copied()
    }
}

/// Graph capability used by the metrics engine
///
/// Returned maps hold an entry for every requested vertex present in the
/// graph and nothing for the others.
pub trait GraphBackend: Send + Sync {
    /// The backend's graph representation
    type Graph;

    /// Build a graph from an edge list
    fn build(&self, edges: &[Edge]) -> Self::Graph;

    /// Degree per vertex: summed edge weight when `weighted`, else incident edge count
    fn degree(
        &self,
        graph: &Self::Graph,
        vertices: &[String],
        weighted: bool,
    ) -> FxHashMap<String, f64>;

    /// Betweenness centrality per vertex
    fn betweenness(
        &self,
        graph: &Self::Graph,
        vertices: &[String],
        weighted: bool,
    ) -> FxHashMap<String, f64>;
}

/// The built-in backend over [`GraphView`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CsrBackend;

impl GraphBackend for CsrBackend {
    type Graph = GraphView;

    fn build(&self, edges: &[Edge]) -> GraphView {
        GraphView::from_edges(edges)
    }

    fn degree(
        &self,
        graph: &GraphView,
        vertices: &[String],
        weighted: bool,
    ) -> FxHashMap<String, f64> {
        vertices
            .iter()
            .filter_map(|v| {
                let idx = graph.index_of(v)?;
                let degree = if weighted {
                    graph.strength(idx)
                } else {
                    graph.incident_edges[idx] as f64
                };
                Some((v.clone(), degree))
            })
            .collect()
    }

    fn betweenness(
        &self,
        graph: &GraphView,
        vertices: &[String],
        weighted: bool,
    ) -> FxHashMap<String, f64> {
        let scores = if weighted {
            betweenness_weighted(graph)
        } else {
            betweenness_unweighted(graph)
        };

        vertices
            .iter()
            .filter_map(|v| graph.index_of(v).map(|idx| (v.clone(), scores[idx])))
            .collect()
    }
}
