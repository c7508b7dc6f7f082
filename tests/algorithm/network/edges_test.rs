//! Tests for windowed edge list construction

use affil_net::algorithm::network::{EdgeList, build_edgelist, edges_to_record_batch};
use affil_net::schema::{ORG_ID, WEIGHT};
use affil_net::{AffiliationRecord, Error, key_set};

use crate::utils::{affiliations, date, open, two_member_table};

#[test]
fn test_window_pair_gets_one_edge() {
    let edges = build_edgelist(
        &two_member_table(),
        &[key_set(&[ORG_ID])],
        date(2020, 1, 1),
        date(2020, 2, 1),
        None,
        true,
    )
    .unwrap();

    let EdgeList::Edges(edges) = edges else {
        panic!("expected edges");
    };
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].from, "M1");
    assert_eq!(edges[0].to, "M2");
    assert_eq!(edges[0].weight, 1.0);
    assert_eq!(edges[0].labels.as_slice(), ["Org1"]);
}

#[test]
fn test_build_edgelist_is_idempotent() {
    let batch = affiliations(&[
        open("D", "Org2"),
        open("A", "Org1"),
        open("C", "Org1"),
        open("B", "Org1"),
        open("D", "Org1"),
        open("B", "Org2"),
    ]);
    let on_cols = [key_set(&[ORG_ID])];

    let first = build_edgelist(&batch, &on_cols, date(2020, 1, 1), date(2020, 6, 1), None, true)
        .unwrap();
    let second = build_edgelist(&batch, &on_cols, date(2020, 1, 1), date(2020, 6, 1), None, true)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
}

#[test]
fn test_window_without_affiliations_is_empty_graph() {
    let edges = build_edgelist(
        &two_member_table(),
        &[key_set(&[ORG_ID])],
        date(2021, 1, 1),
        date(2021, 2, 1),
        None,
        true,
    )
    .unwrap();
    assert!(edges.is_empty_graph());

    let table = edges_to_record_batch(&edges).unwrap();
    assert_eq!(table.num_rows(), 0);
}

#[test]
fn test_weighted_edges_use_weaker_member() {
    let batch = affiliations(&[
        AffiliationRecord::new("A", "Org1", date(2020, 1, 1), None).with_weight(4.0),
        AffiliationRecord::new("B", "Org1", date(2020, 1, 1), None).with_weight(1.5),
    ]);
    let edges = build_edgelist(
        &batch,
        &[key_set(&[ORG_ID])],
        date(2020, 1, 1),
        date(2020, 2, 1),
        Some(WEIGHT),
        false,
    )
    .unwrap();

    assert_eq!(edges.edges()[0].weight, 1.5);
    assert!(edges.edges()[0].labels.is_empty());
}

#[test]
fn test_invalid_inputs() {
    let batch = two_member_table();
    let org = [key_set(&[ORG_ID])];
    let (jan, feb) = (date(2020, 1, 1), date(2020, 2, 1));

    assert!(matches!(
        build_edgelist(&batch, &org, feb, jan, None, true),
        Err(Error::InvalidDateRange { .. })
    ));
    assert!(matches!(
        build_edgelist(&batch, &[key_set(&["Missing"])], jan, feb, None, true),
        Err(Error::ColumnNotFound { .. })
    ));
    assert!(matches!(
        build_edgelist(&batch, &org, jan, feb, Some(ORG_ID), true),
        Err(Error::ColumnType { .. })
    ));
}
