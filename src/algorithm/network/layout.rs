//! Force-directed layout with caller-owned continuity
//!
//! Positions from a previous [`LayoutSnapshot`] seed the next layout so
//! nodes stay put across windows. The caller keeps the returned snapshot and
//! passes it back on the next call.

use std::collections::{BTreeMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::algorithm::network::edges::EdgeList;

/// Layout simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Number of simulation steps
    pub iterations: u32,
    /// Time step per simulation update
    pub time_step: f32,
    /// Radius of the circle new members are placed on
    pub radius: f64,
    /// Node repulsion strength
    pub force_charge: f32,
    /// Edge spring strength
    pub force_spring: f32,
    /// Upper bound on a single force
    pub force_max: f32,
    /// Node speed
    pub node_speed: f32,
    /// Velocity damping per step
    pub damping_factor: f32,
    /// Seed for the jitter applied to newly placed members
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            time_step: 0.035,
            radius: 100.0,
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
            seed: 42,
        }
    }
}

/// Position of one member
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

/// Member positions produced by a layout run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Positions keyed by member id
    pub positions: BTreeMap<String, NodePosition>,
}

impl LayoutSnapshot {
    /// Position of a member, if laid out
    #[must_use]
    pub fn position(&self, member: &str) -> Option<NodePosition> {
        self.positions.get(member).copied()
    }

    /// Number of laid out members
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no member was laid out
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
struct NodeInfo {
    member_id: String,
}

/// Lay out `members` and the edges between them
///
/// Members found in `previous` start from their old position; others are
/// placed on a circle with a small seeded jitter. Edges whose endpoints are
/// not both in `members` are skipped, and parallel edges become one spring.
#[must_use]
pub fn compute_layout(
    edges: &EdgeList,
    members: &[String],
    previous: Option<&LayoutSnapshot>,
    config: &LayoutConfig,
) -> LayoutSnapshot {
    if members.is_empty() {
        return LayoutSnapshot::default();
    }

    let mut graph: ForceGraph<NodeInfo, ()> = ForceGraph::new(SimulationParameters {
        force_charge: config.force_charge,
        force_spring: config.force_spring,
        force_max: config.force_max,
        node_speed: config.node_speed,
        damping_factor: config.damping_factor,
    });
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut id_to_idx: BTreeMap<&str, DefaultNodeIdx> = BTreeMap::new();

    for (i, member) in members.iter().enumerate() {
        if id_to_idx.contains_key(member.as_str()) {
            continue;
        }
        let (x, y) = match previous.and_then(|p| p.position(member)) {
            Some(pos) => (pos.x, pos.y),
            None => {
                let angle = (i as f64) * 2.0 * PI / members.len() as f64;
                (
                    config.radius * angle.cos() + rng.random_range(-1.0..1.0),
                    config.radius * angle.sin() + rng.random_range(-1.0..1.0),
                )
            }
        };

        let idx = graph.add_node(NodeData {
            x: x as f32,
            y: y as f32,
            mass: 10.0,
            is_anchor: false,
            user_data: NodeInfo {
                member_id: member.clone(),
            },
        });
        id_to_idx.insert(member.as_str(), idx);
    }

    let mut springs = HashSet::new();
    for edge in edges.edges() {
        if let (Some(&src), Some(&tgt)) = (
            id_to_idx.get(edge.from.as_str()),
            id_to_idx.get(edge.to.as_str()),
        ) {
            if src != tgt && springs.insert((edge.from.as_str(), edge.to.as_str())) {
                graph.add_edge(src, tgt, EdgeData::default());
            }
        }
    }

    for _ in 0..config.iterations {
        graph.update(config.time_step);
    }

    let mut positions = BTreeMap::new();
    graph.visit_nodes(|node| {
        positions.insert(
            node.data.user_data.member_id.clone(),
            NodePosition {
                x: f64::from(node.x()),
                y: f64::from(node.y()),
            },
        );
    });

    LayoutSnapshot { positions }
}
