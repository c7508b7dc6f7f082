//! End-to-end tests from affiliation tables to metrics tables

use std::sync::Arc;

use affil_net::algorithm::network::{GroupingKey, MemberGrouping, metrics_to_record_batch};
use affil_net::algorithm::temporal::TemporalAggregator;
use affil_net::schema::{END_DATE, MEMBER_ID, ORG_ID, START_DATE};
use affil_net::{RecordBatch, build_edgelist, compute_all_metrics, compute_window_metrics, key_set};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};

use crate::utils::{date, names, two_member_table};

#[test]
fn test_two_member_scenario() {
    let batch = two_member_table();
    let on_cols = [key_set(&[ORG_ID])];

    let edges =
        build_edgelist(&batch, &on_cols, date(2020, 1, 1), date(2020, 2, 1), None, true).unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges.edges()[0].weight, 1.0);

    let rows = compute_window_metrics(
        &batch,
        &on_cols,
        None,
        &names(&["M1", "M2"]),
        date(2020, 1, 1),
        date(2020, 2, 1),
    )
    .unwrap();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.degree, Some(1.0));
        assert_eq!(row.centrality, Some(0.0));
        // Zero spread normalizes to 0.0 rather than NA
        assert_eq!(row.degree_normalized, Some(0.0));
        assert_eq!(row.centrality_normalized, Some(0.0));
    }
    // Ties keep the requested order
    assert_eq!(rows[0].degree_rank, Some(1));
    assert_eq!(rows[1].degree_rank, Some(2));
}

#[test]
fn test_unknown_member_keeps_a_row() {
    let rows = compute_window_metrics(
        &two_member_table(),
        &[key_set(&[ORG_ID])],
        None,
        &names(&["M1", "Nobody", "M2"]),
        date(2020, 1, 1),
        date(2020, 2, 1),
    )
    .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].member_id, "Nobody");
    assert!(!rows[1].is_valid());
    assert_eq!(rows[2].degree_rank, Some(2));
}

#[test]
fn test_string_dated_table() {
    let schema = Arc::new(Schema::new(vec![
        Field::new(MEMBER_ID, DataType::Utf8, false),
        Field::new(ORG_ID, DataType::Utf8, false),
        Field::new(START_DATE, DataType::Utf8, false),
        Field::new(END_DATE, DataType::Utf8, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["M1", "M2", "M3"])),
        Arc::new(StringArray::from(vec!["Org1", "Org1", "Org1"])),
        Arc::new(StringArray::from(vec!["2020-01-01", "2020-01-15", "2020-06-01"])),
        Arc::new(StringArray::from(vec![Some("2020-02-01"), None, None])),
    ];
    let batch = RecordBatch::try_new(schema, columns).unwrap();

    let rows = compute_all_metrics(
        &batch,
        &[key_set(&[ORG_ID])],
        None,
        None,
        Some(date(2020, 1, 1)),
        Some(date(2020, 4, 1)),
        "months",
    )
    .unwrap();

    // Two windows of three members; M3 never joins
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().filter(|r| r.member_id == "M3").all(|r| !r.is_valid()));
    // M1's affiliation ends on February 1 and still touches the second window
    assert_eq!(rows[3].degree, Some(1.0));
}

#[test]
fn test_grouping_resolved_from_table() {
    let batch = two_member_table();
    let grouping = MemberGrouping::resolve(&batch, GroupingKey::Organization).unwrap();
    assert_eq!(grouping.category("M1"), Some("Org1"));

    let rows = TemporalAggregator::new(&batch, &[key_set(&[ORG_ID])], None)
        .unwrap()
        .with_grouping(grouping)
        .window_metrics(&names(&["M1", "M2"]), date(2020, 1, 1), date(2020, 2, 1))
        .unwrap();
    // Everyone shares one organization, so nothing crosses groups
    assert!(rows.iter().all(|r| r.cross_degree == Some(0.0)));
}

#[test]
fn test_metrics_table_export() {
    let rows = compute_all_metrics(
        &two_member_table(),
        &[key_set(&[ORG_ID])],
        None,
        None,
        Some(date(2020, 1, 1)),
        Some(date(2020, 4, 1)),
        "months",
    )
    .unwrap();
    let table = metrics_to_record_batch(&rows).unwrap();

    assert_eq!(table.num_rows(), rows.len());
    assert_eq!(table.schema().field(0).name(), MEMBER_ID);

    let json = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(json["Member.ID"], "M1");
    assert_eq!(json["Start.Date"], "2020-01-01");
}
