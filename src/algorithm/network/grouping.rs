//! Member categories and cross-group degree
//!
//! A [`GroupingKey`] names one of a fixed set of member attributes. It is
//! resolved once against the affiliation table into a [`MemberGrouping`], a
//! plain member → category map, instead of looking columns up per row.

use std::fmt;
use std::str::FromStr;

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::algorithm::network::edges::EdgeList;
use crate::error::{Error, Result};
use crate::schema::{MEMBER_ID, ORG_ID, ORG_TYPE};
use crate::utils::string_values;

/// Member attributes that can be used to categorise members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupingKey {
    /// The member's organization
    Organization,
    /// The member's affiliation type
    AffiliationType,
}

impl GroupingKey {
    /// Column holding this attribute in the affiliation table
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Self::Organization => ORG_ID,
            Self::AffiliationType => ORG_TYPE,
        }
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization => f.write_str("organization"),
            Self::AffiliationType => f.write_str("type"),
        }
    }
}

impl FromStr for GroupingKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organization" | "org" => Ok(Self::Organization),
            "type" | "affiliation-type" => Ok(Self::AffiliationType),
            other => Err(Error::Validation(format!("unknown grouping key '{other}'"))),
        }
    }
}

/// Category of each member under one grouping key
#[derive(Debug, Clone, Default)]
pub struct MemberGrouping {
    key: Option<GroupingKey>,
    categories: FxHashMap<String, String>,
}

impl MemberGrouping {
    /// Resolve a grouping key against an affiliation table
    ///
    /// A member's category is the first non-null value of the key column
    /// among their records, in table order.
    pub fn resolve(affiliations: &RecordBatch, key: GroupingKey) -> Result<Self> {
        let members = string_values(affiliations, MEMBER_ID)?;
        let values = string_values(affiliations, key.column())?;

        let mut categories = FxHashMap::default();
        for (member, value) in members.into_iter().zip(values) {
            if let (Some(member), Some(value)) = (member, value) {
                categories.entry(member).or_insert(value);
            }
        }

        Ok(Self {
            key: Some(key),
            categories,
        })
    }

    /// Build a grouping from explicit member → category pairs
    pub fn from_pairs<I, M, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (M, C)>,
        M: Into<String>,
        C: Into<String>,
    {
        Self {
            key: None,
            categories: pairs
                .into_iter()
                .map(|(m, c)| (m.into(), c.into()))
                .collect(),
        }
    }

    /// The key this grouping was resolved from, if any
    #[must_use]
    pub fn key(&self) -> Option<GroupingKey> {
        self.key
    }

    /// Category of a member
    #[must_use]
    pub fn category(&self, member: &str) -> Option<&str> {
        self.categories.get(member).map(String::as_str)
    }

    /// Number of categorised members
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether no member is categorised
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Degree counting only edges whose endpoints fall in different categories
///
/// Every member appearing in `edges` gets an entry. Edges with an
/// uncategorised endpoint never count as crossing.
#[must_use]
pub fn cross_group_degree(
    edges: &EdgeList,
    grouping: &MemberGrouping,
    weighted: bool,
) -> FxHashMap<String, f64> {
    let mut degree: FxHashMap<String, f64> = FxHashMap::default();

    for edge in edges.edges().iter().filter(|e| e.from != e.to) {
        let crosses = matches!(
            (grouping.category(&edge.from), grouping.category(&edge.to)),
            (Some(a), Some(b)) if a != b
        );
        let contribution = match (crosses, weighted) {
            (false, _) => 0.0,
            (true, true) => edge.weight,
            (true, false) => 1.0,
        };
        *degree.entry(edge.from.clone()).or_insert(0.0) += contribution;
        *degree.entry(edge.to.clone()).or_insert(0.0) += contribution;
    }

    degree
}
