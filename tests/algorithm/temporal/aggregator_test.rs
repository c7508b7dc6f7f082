//! Tests for windowed aggregation

use affil_net::algorithm::network::MemberGrouping;
use affil_net::algorithm::temporal::compute_all_metrics_with_config;
use affil_net::schema::ORG_ID;
use affil_net::{
    AffiliationRecord, Error, NetworkConfig, StepCountPolicy, TemporalAggregator, TimeStep,
    compute_all_metrics, key_set,
};

use crate::utils::{affiliations, date, names, star_table, two_member_table};

#[test]
fn test_three_months_give_two_windows() {
    let rows = compute_all_metrics(
        &star_table(),
        &[key_set(&[ORG_ID])],
        None,
        Some(&names(&["H", "A"])),
        Some(date(2020, 1, 1)),
        Some(date(2020, 4, 1)),
        "months",
    )
    .unwrap();

    assert_eq!(rows.len(), 2 * 2);
    let windows: Vec<_> = rows.iter().map(|r| (r.start_date, r.end_date)).collect();
    assert_eq!(
        windows,
        vec![
            (date(2020, 1, 1), date(2020, 2, 1)),
            (date(2020, 1, 1), date(2020, 2, 1)),
            (date(2020, 2, 1), date(2020, 3, 1)),
            (date(2020, 2, 1), date(2020, 3, 1)),
        ]
    );
    // Members keep their requested order within every window
    assert_eq!(rows[2].member_id, "H");
    assert_eq!(rows[3].member_id, "A");
}

#[test]
fn test_full_tiling_policy() {
    let config = NetworkConfig {
        step_policy: StepCountPolicy::FullTiling,
        ..NetworkConfig::default()
    };
    let rows = TemporalAggregator::new(&star_table(), &[key_set(&[ORG_ID])], None)
        .unwrap()
        .with_config(config)
        .run(Some(&names(&["H"])), Some(date(2020, 1, 1)), Some(date(2020, 4, 1)))
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_defaults_come_from_table() {
    let batch = affiliations(&[
        AffiliationRecord::new("B", "Org1", date(2020, 1, 1), Some(date(2021, 1, 1))),
        AffiliationRecord::new("A", "Org1", date(2020, 3, 1), None),
    ]);

    let rows = compute_all_metrics(&batch, &[key_set(&[ORG_ID])], None, None, None, None, "years")
        .unwrap();
    // One whole year with the historical policy gives no window
    assert!(rows.is_empty());

    let rows = compute_all_metrics(&batch, &[key_set(&[ORG_ID])], None, None, None, None, "months")
        .unwrap();
    // Twelve whole months, eleven windows, members sorted
    assert_eq!(rows.len(), 11 * 2);
    assert_eq!(rows[0].member_id, "A");
    assert_eq!(rows[1].member_id, "B");
    assert_eq!(rows[0].start_date, date(2020, 1, 1));
    // A has not joined yet in January
    assert!(!rows[0].is_valid());
    assert!(!rows[1].is_valid());
    // Both are connected once A has joined
    assert_eq!(rows[4].degree, Some(1.0));
    assert_eq!(rows[5].degree, Some(1.0));
}

#[test]
fn test_open_ended_table_falls_back_to_latest_start() {
    let batch = affiliations(&[
        AffiliationRecord::new("A", "Org1", date(2020, 1, 1), None),
        AffiliationRecord::new("B", "Org1", date(2020, 4, 1), None),
    ]);
    let aggregator = TemporalAggregator::new(&batch, &[key_set(&[ORG_ID])], None).unwrap();

    assert_eq!(
        aggregator.date_range().unwrap(),
        Some((date(2020, 1, 1), date(2020, 4, 1)))
    );
    assert_eq!(aggregator.run(None, None, None).unwrap().len(), 2 * 2);
}

#[test]
fn test_invalid_arguments_fail_fast() {
    let batch = two_member_table();
    let on_cols = [key_set(&[ORG_ID])];

    assert!(matches!(
        compute_all_metrics(&batch, &on_cols, None, None, None, None, "fortnights"),
        Err(Error::InvalidTimestepUnit(unit)) if unit == "fortnights"
    ));
    assert!(matches!(
        compute_all_metrics(
            &batch,
            &on_cols,
            None,
            None,
            Some(date(2020, 3, 1)),
            Some(date(2020, 1, 1)),
            "days"
        ),
        Err(Error::InvalidDateRange { .. })
    ));
    assert!(matches!(
        compute_all_metrics(&batch, &[], None, None, None, None, "days"),
        Err(Error::Validation(_))
    ));
}

#[test]
fn test_parallel_matches_sequential() {
    let batch = star_table();
    let on_cols = [key_set(&[ORG_ID])];
    let members = names(&["H", "A", "B", "C", "Z"]);
    let config = NetworkConfig::default().with_timestep(TimeStep::Days);

    let sequential = compute_all_metrics_with_config(
        &batch,
        &on_cols,
        None,
        Some(&members),
        Some(date(2020, 1, 1)),
        Some(date(2020, 1, 12)),
        &config,
        None,
    )
    .unwrap();
    let parallel = compute_all_metrics_with_config(
        &batch,
        &on_cols,
        None,
        Some(&members),
        Some(date(2020, 1, 1)),
        Some(date(2020, 1, 12)),
        &config.clone().with_parallel(true),
        None,
    )
    .unwrap();

    assert_eq!(sequential.len(), 10 * members.len());
    assert_eq!(sequential, parallel);
}

#[test]
fn test_cross_degree_with_grouping() {
    let grouping = MemberGrouping::from_pairs([("H", "staff"), ("A", "staff"), ("B", "guest")]);
    let rows = TemporalAggregator::new(&star_table(), &[key_set(&[ORG_ID])], None)
        .unwrap()
        .with_grouping(grouping)
        .window_metrics(&names(&["H", "A", "B", "C"]), date(2020, 1, 1), date(2020, 2, 1))
        .unwrap();

    let cross: Vec<_> = rows.iter().map(|r| r.cross_degree).collect();
    // H-A stays inside "staff", H-B crosses, C is uncategorised
    assert_eq!(cross, vec![Some(1.0), Some(0.0), Some(1.0), Some(0.0)]);
}
