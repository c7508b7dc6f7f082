//! Edge list construction from shared affiliations
//!
//! Members sharing the value of a grouping key set during a window are
//! connected pairwise. Each key set produces its own edges, so with an
//! umbrella/subgroup hierarchy a pair sharing both levels receives one edge
//! per level.

use std::collections::BTreeMap;

use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::filter::filter_active_affiliations;
use crate::schema::{MEMBER_ID, validate_affiliations};
use crate::utils::{float_values, string_values};

/// Separator placed between key values when a key set has several columns
pub const LABEL_SEPARATOR: &str = " / ";

/// Group labels attached to an edge; most edges come from one or two groups
pub type EdgeLabels = SmallVec<[String; 2]>;

/// One or more column names whose values jointly identify a group
pub type KeySet = Vec<String>;

/// Build a key set from column names
#[must_use]
pub fn key_set(columns: &[&str]) -> KeySet {
    columns.iter().map(|c| (*c).to_string()).collect()
}

/// An undirected co-membership edge with `from < to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Lexicographically smaller member
    pub from: String,
    /// Lexicographically larger member
    pub to: String,
    /// Summed tie strength over every shared group in this key set
    pub weight: f64,
    /// Labels of the shared groups, empty unless edge names were requested
    pub labels: EdgeLabels,
    /// Index of the key set that produced this edge
    pub key_set: usize,
}

impl Edge {
    /// Create an edge, ordering the endpoints canonically
    pub fn new(a: impl Into<String>, b: impl Into<String>, weight: f64, key_set: usize) -> Self {
        let (a, b) = (a.into(), b.into());
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        Self {
            from,
            to,
            weight,
            labels: EdgeLabels::new(),
            key_set,
        }
    }

    /// Whether the edge touches `member`
    #[must_use]
    pub fn touches(&self, member: &str) -> bool {
        self.from == member || self.to == member
    }
}

/// The edges of one time window
///
/// `EmptyGraph` means no affiliation was active in the window at all, which
/// is different from active affiliations that produced no pair.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeList {
    /// No affiliation records survived filtering
    EmptyGraph,
    /// Edges between members (possibly none)
    Edges(Vec<Edge>),
}

impl EdgeList {
    /// Whether this is the empty-graph marker
    #[must_use]
    pub fn is_empty_graph(&self) -> bool {
        matches!(self, Self::EmptyGraph)
    }

    /// The edges, empty for the empty-graph marker
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        match self {
            Self::EmptyGraph => &[],
            Self::Edges(edges) => edges,
        }
    }

    /// Number of edges
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges().len()
    }

    /// Whether there are no edges
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges().is_empty()
    }
}

/// Members of each group, keyed by the group's key values, with each member's weight
type Groups = BTreeMap<Vec<String>, BTreeMap<String, f64>>;

/// Builds edge lists from an already filtered affiliation table
#[derive(Debug, Clone)]
pub struct EdgeBuilder {
    key_sets: Vec<KeySet>,
    weight_column: Option<String>,
    get_edge_names: bool,
}

impl EdgeBuilder {
    /// Create a builder for the given grouping key sets
    ///
    /// # Errors
    /// Returns a validation error if no key set is given or a key set is empty
    pub fn new(key_sets: &[KeySet]) -> Result<Self> {
        if key_sets.is_empty() {
            return Err(Error::Validation(
                "at least one grouping key set is required".to_string(),
            ));
        }
        if let Some(idx) = key_sets.iter().position(Vec::is_empty) {
            return Err(Error::Validation(format!("grouping key set {idx} has no columns")));
        }

        Ok(Self {
            key_sets: key_sets.to_vec(),
            weight_column: None,
            get_edge_names: true,
        })
    }

    /// Take edge weights from a numeric column
    #[must_use]
    pub fn with_weight_column(mut self, column: Option<&str>) -> Self {
        self.weight_column = column.map(str::to_string);
        self
    }

    /// Attach group labels to edges
    #[must_use]
    pub fn with_edge_names(mut self, get_edge_names: bool) -> Self {
        self.get_edge_names = get_edge_names;
        self
    }

    /// Whether edge weights come from a weight column
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        self.weight_column.is_some()
    }

    /// Build the edge list for a filtered affiliation table
    pub fn build(&self, filtered: &RecordBatch) -> Result<EdgeList> {
        if filtered.num_rows() == 0 {
            return Ok(EdgeList::EmptyGraph);
        }

        let members = string_values(filtered, MEMBER_ID)?;
        let weights = match &self.weight_column {
            Some(column) => Some(float_values(filtered, column)?),
            None => None,
        };

        let mut edges = Vec::new();
        for (idx, key_set) in self.key_sets.iter().enumerate() {
            let groups = self.partition(filtered, key_set, &members, weights.as_deref())?;
            edges.extend(self.pair_edges(idx, &groups));
        }

        debug!(
            "Built {} edges from {} affiliations over {} key sets",
            edges.len(),
            filtered.num_rows(),
            self.key_sets.len()
        );
        Ok(EdgeList::Edges(edges))
    }

    /// Group members by key value, keeping each member's largest weight per group
    fn partition(
        &self,
        filtered: &RecordBatch,
        key_set: &[String],
        members: &[Option<String>],
        weights: Option<&[Option<f64>]>,
    ) -> Result<Groups> {
        let key_columns = key_set
            .iter()
            .map(|column| string_values(filtered, column))
            .collect::<Result<Vec<_>>>()?;

        let mut groups = Groups::new();
        for (row, member) in members.iter().enumerate() {
            let Some(member) = member else { continue };

            // Rows with a null in any key column do not join a group for this key set
            let Some(parts) = key_columns
                .iter()
                .map(|values| values[row].clone())
                .collect::<Option<Vec<String>>>()
            else {
                continue;
            };

            // Null, non-finite and non-positive weights all count as 1
            let weight = weights
                .and_then(|w| w[row])
                .filter(|w| w.is_finite() && *w > 0.0)
                .unwrap_or(1.0);

            let entry = groups
                .entry(parts)
                .or_default()
                .entry(member.clone())
                .or_insert(weight);
            *entry = entry.max(weight);
        }

        Ok(groups)
    }

    /// Emit one edge per member pair, summing over the groups the pair shares
    fn pair_edges(&self, key_set: usize, groups: &Groups) -> Vec<Edge> {
        let mut pairs: BTreeMap<(&str, &str), (f64, EdgeLabels)> = BTreeMap::new();

        for (key, group) in groups.iter().filter(|(_, g)| g.len() >= 2) {
            let label = key.join(LABEL_SEPARATOR);
            // BTreeMap keys are sorted, so every combination is already (from < to)
            for ((a, wa), (b, wb)) in group.iter().tuple_combinations() {
                let contribution = if self.is_weighted() { wa.min(*wb) } else { 1.0 };
                let (weight, labels) = pairs.entry((a.as_str(), b.as_str())).or_default();
                *weight += contribution;
                if self.get_edge_names {
                    labels.push(label.clone());
                }
            }
        }

        pairs
            .into_iter()
            .map(|((from, to), (weight, labels))| Edge {
                from: from.to_string(),
                to: to.to_string(),
                weight,
                labels,
                key_set,
            })
            .collect()
    }
}

/// Build the edge list for the affiliations active in `[start, end)`
///
/// # Arguments
/// * `affiliations` - The full affiliation table
/// * `on_cols` - Grouping key sets; each produces its own edges
/// * `start` - Window start (inclusive)
/// * `end` - Window end (exclusive)
/// * `weight_col` - Optional numeric column holding tie strengths
/// * `get_edge_names` - Attach group labels to edges
pub fn build_edgelist(
    affiliations: &RecordBatch,
    on_cols: &[KeySet],
    start: NaiveDate,
    end: NaiveDate,
    weight_col: Option<&str>,
    get_edge_names: bool,
) -> Result<EdgeList> {
    let config = NetworkConfig {
        get_edge_names,
        ..NetworkConfig::default()
    };
    build_edgelist_with_config(affiliations, on_cols, start, end, weight_col, &config)
}

/// Build the edge list for `[start, end)` using persistence and naming settings from `config`
pub fn build_edgelist_with_config(
    affiliations: &RecordBatch,
    on_cols: &[KeySet],
    start: NaiveDate,
    end: NaiveDate,
    weight_col: Option<&str>,
    config: &NetworkConfig,
) -> Result<EdgeList> {
    validate_affiliations(affiliations)?;
    let builder = EdgeBuilder::new(on_cols)?
        .with_weight_column(weight_col)
        .with_edge_names(config.get_edge_names);

    let active = filter_active_affiliations(affiliations, start, end, config)?;
    builder.build(&active)
}
