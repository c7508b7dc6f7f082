//! Per-window member metrics
//!
//! Turns a window's edge list into one [`MetricsRow`] per requested member.
//! Members outside the window's graph keep a row with NA (`None`) metrics so
//! longitudinal tables stay rectangular.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::network::edges::EdgeList;
use crate::algorithm::network::graph::{CsrBackend, GraphBackend};
use crate::algorithm::network::grouping::{MemberGrouping, cross_group_degree};

/// Metrics for one member in one time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    /// Member identifier
    #[serde(rename = "Member.ID")]
    pub member_id: String,
    /// Betweenness centrality
    #[serde(rename = "Centrality")]
    pub centrality: Option<f64>,
    /// Degree (edge count, or summed weight for weighted graphs)
    #[serde(rename = "Degree")]
    pub degree: Option<f64>,
    /// Centrality z-score among the window's valid members
    #[serde(rename = "Centrality.Normalized")]
    pub centrality_normalized: Option<f64>,
    /// Degree z-score among the window's valid members
    #[serde(rename = "Degree.Normalized")]
    pub degree_normalized: Option<f64>,
    /// Descending centrality rank, 1 is highest
    #[serde(rename = "Centrality.Rank")]
    pub centrality_rank: Option<u32>,
    /// Descending degree rank, 1 is highest
    #[serde(rename = "Degree.Rank")]
    pub degree_rank: Option<u32>,
    /// Degree over edges that cross member groups, when a grouping is configured
    #[serde(rename = "Cross.Degree")]
    pub cross_degree: Option<f64>,
    /// Window start (inclusive)
    #[serde(rename = "Start.Date")]
    pub start_date: NaiveDate,
    /// Window end (exclusive)
    #[serde(rename = "End.Date")]
    pub end_date: NaiveDate,
}

impl MetricsRow {
    /// A row with every metric NA
    pub fn missing(
        member_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            centrality: None,
            degree: None,
            centrality_normalized: None,
            degree_normalized: None,
            centrality_rank: None,
            degree_rank: None,
            cross_degree: None,
            start_date,
            end_date,
        }
    }

    /// Whether the member was part of the window's graph
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.degree.is_some()
    }
}

/// Z-score the non-NA values using the sample standard deviation
///
/// When the standard deviation is zero or undefined (fewer than two values)
/// every valid value normalizes to `0.0`. NA stays NA.
#[must_use]
pub fn z_scores(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let valid: Vec<f64> = values.iter().flatten().copied().collect();
    let n = valid.len();
    if n == 0 {
        return vec![None; values.len()];
    }

    let mean = valid.iter().sum::<f64>() / n as f64;
    let sd = if n > 1 {
        (valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    values
        .iter()
        .map(|value| {
            value.map(|v| {
                if sd > 0.0 && sd.is_finite() {
                    (v - mean) / sd
                } else {
                    0.0
                }
            })
        })
        .collect()
}

/// Rank the non-NA values in descending order
///
/// Ranks run `1..=k` over the `k` valid values. Ties keep their input order,
/// so the first of two equal values gets the better rank.
#[must_use]
pub fn descending_ranks(values: &[Option<f64>]) -> Vec<Option<u32>> {
    let mut order: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    // Stable sort keeps encounter order among ties
    order.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut ranks = vec![None; values.len()];
    for (rank, (idx, _)) in order.into_iter().enumerate() {
        ranks[idx] = u32::try_from(rank + 1).ok();
    }
    ranks
}

/// Computes metrics rows from edge lists
pub struct MetricsEngine<B: GraphBackend = CsrBackend> {
    backend: B,
    weighted: bool,
    grouping: Option<MemberGrouping>,
}

impl MetricsEngine<CsrBackend> {
    /// Create an engine with the built-in graph backend
    #[must_use]
    pub fn new(weighted: bool) -> Self {
        Self::with_backend(CsrBackend, weighted)
    }
}

impl<B: GraphBackend> MetricsEngine<B> {
    /// Create an engine with a custom graph backend
    pub fn with_backend(backend: B, weighted: bool) -> Self {
        Self {
            backend,
            weighted,
            grouping: None,
        }
    }

    /// Also compute cross-group degree using this member grouping
    #[must_use]
    pub fn with_grouping(mut self, grouping: Option<MemberGrouping>) -> Self {
        self.grouping = grouping;
        self
    }

    /// Whether degree and betweenness use edge weights
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Compute one row per requested member for the window `[start, end)`
    ///
    /// An empty member list gives an empty table.
    pub fn compute(
        &self,
        edges: &EdgeList,
        members: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<MetricsRow> {
        let mut rows: Vec<MetricsRow> = members
            .iter()
            .map(|m| MetricsRow::missing(m.clone(), start, end))
            .collect();

        if edges.is_empty_graph() || members.is_empty() {
            return rows;
        }

        let graph = self.backend.build(edges.edges());
        let degree = self.backend.degree(&graph, members, self.weighted);
        let betweenness = self.backend.betweenness(&graph, members, self.weighted);
        let cross = self
            .grouping
            .as_ref()
            .map(|g| cross_group_degree(edges, g, self.weighted));

        for row in &mut rows {
            // Both measures are defined exactly for the graph's vertices
            let id = &row.member_id;
            if let (Some(d), Some(c)) = (degree.get(id), betweenness.get(id)) {
                row.degree = Some(*d);
                row.centrality = Some(*c);
                row.cross_degree = cross
                    .as_ref()
                    .map(|cross| cross.get(&row.member_id).copied().unwrap_or(0.0));
            }
        }

        let degrees: Vec<Option<f64>> = rows.iter().map(|r| r.degree).collect();
        let centralities: Vec<Option<f64>> = rows.iter().map(|r| r.centrality).collect();

        let degree_z = z_scores(&degrees);
        let centrality_z = z_scores(&centralities);
        let degree_rank = descending_ranks(&degrees);
        let centrality_rank = descending_ranks(&centralities);

        for (i, row) in rows.iter_mut().enumerate() {
            row.degree_normalized = degree_z[i];
            row.centrality_normalized = centrality_z[i];
            row.degree_rank = degree_rank[i];
            row.centrality_rank = centrality_rank[i];
        }

        debug!(
            "Window [{start}, {end}): {} of {} members in graph",
            rows.iter().filter(|r| r.is_valid()).count(),
            rows.len()
        );
        rows
    }
}
