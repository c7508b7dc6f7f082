//! Affiliation network construction and member metrics
//!
//! Edges are derived from shared affiliations, collapsed into an undirected
//! graph, and summarised per member as degree, betweenness, z-scores and
//! ranks.

pub mod centrality;
pub mod edges;
pub mod export;
pub mod graph;
pub mod grouping;
pub mod layout;
pub mod metrics;

pub use edges::{
    Edge, EdgeBuilder, EdgeLabels, EdgeList, KeySet, build_edgelist, build_edgelist_with_config,
    key_set,
};
pub use export::{edges_to_record_batch, metrics_to_record_batch};
pub use graph::{CsrBackend, GraphBackend, GraphView};
pub use grouping::{GroupingKey, MemberGrouping, cross_group_degree};
pub use layout::{LayoutConfig, LayoutSnapshot, NodePosition, compute_layout};
pub use metrics::{MetricsEngine, MetricsRow, descending_ranks, z_scores};
