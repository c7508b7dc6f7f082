//! Tests for window overlap filtering and persistence modes

use affil_net::filter::{BatchFilter, IntervalOverlapFilter, filter_active_affiliations};
use affil_net::schema::MEMBER_ID;
use affil_net::utils::string_values;
use affil_net::{AffiliationRecord, Error, NetworkConfig, PersistenceMode, RecordBatch};

use crate::utils::{affiliations, date};

fn active_members(batch: &RecordBatch) -> Vec<String> {
    string_values(batch, MEMBER_ID)
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

fn history() -> RecordBatch {
    affiliations(&[
        // Ended before the window
        AffiliationRecord::new("past", "Org1", date(2019, 1, 1), Some(date(2019, 12, 31))),
        // Event that ended two weeks before the window
        AffiliationRecord::new("event", "Gala", date(2019, 12, 10), Some(date(2019, 12, 15)))
            .with_type("Event"),
        // Open-ended
        AffiliationRecord::new("open", "Org1", date(2018, 6, 1), None),
        // Starts after the window
        AffiliationRecord::new("future", "Org1", date(2020, 3, 1), None),
        // Overlaps the window
        AffiliationRecord::new("current", "Org2", date(2020, 1, 10), Some(date(2020, 1, 20))),
    ])
}

#[test]
fn test_no_persistence() {
    let active = filter_active_affiliations(
        &history(),
        date(2020, 1, 1),
        date(2020, 2, 1),
        &NetworkConfig::default(),
    )
    .unwrap();

    assert_eq!(active_members(&active), vec!["open", "current"]);
}

#[test]
fn test_persist_all_keeps_ended_affiliations() {
    let config = NetworkConfig::default().with_persistence(PersistenceMode::All, 0);
    let active = filter_active_affiliations(&history(), date(2020, 1, 1), date(2020, 2, 1), &config)
        .unwrap();

    assert_eq!(active_members(&active), vec!["past", "event", "open", "current"]);
}

#[test]
fn test_events_linger_for_configured_months() {
    let lingering = NetworkConfig::default().with_persistence(PersistenceMode::EventsOnly, 1);
    let active =
        filter_active_affiliations(&history(), date(2020, 1, 1), date(2020, 2, 1), &lingering)
            .unwrap();
    assert_eq!(active_members(&active), vec!["event", "open", "current"]);

    // One month of linger does not reach a window starting in February;
    // "future" starts on that window's end date and counts as active
    let active =
        filter_active_affiliations(&history(), date(2020, 2, 1), date(2020, 3, 1), &lingering)
            .unwrap();
    assert_eq!(active_members(&active), vec!["open", "future"]);
}

#[test]
fn test_events_only_requires_type_column() {
    let mut config = NetworkConfig::default().with_persistence(PersistenceMode::EventsOnly, 1);
    config.event_type_column = "Kind".to_string();

    let result =
        filter_active_affiliations(&history(), date(2020, 1, 1), date(2020, 2, 1), &config);
    assert!(matches!(result, Err(Error::ColumnNotFound { column }) if column == "Kind"));
}

#[test]
fn test_boundaries_are_inclusive() {
    let batch = affiliations(&[
        // Ends on the window start
        AffiliationRecord::new("ends", "Org1", date(2019, 12, 1), Some(date(2020, 1, 1))),
        // Starts on the window end
        AffiliationRecord::new("starts", "Org1", date(2020, 2, 1), None),
    ]);

    let filter = IntervalOverlapFilter::new(date(2020, 1, 1), date(2020, 2, 1)).unwrap();
    let mask = filter.mask(&batch).unwrap();
    assert!(mask.value(0));
    assert!(mask.value(1));
    assert_eq!(filter.filter(&batch).unwrap().num_rows(), 2);
}

#[test]
fn test_invalid_window() {
    assert!(matches!(
        IntervalOverlapFilter::new(date(2020, 2, 1), date(2020, 1, 1)),
        Err(Error::InvalidDateRange { .. })
    ));
}

#[test]
fn test_persistence_mode_parsing() {
    assert_eq!("events-only".parse::<PersistenceMode>().unwrap(), PersistenceMode::EventsOnly);
    assert_eq!("ALL".parse::<PersistenceMode>().unwrap(), PersistenceMode::All);
    assert!(matches!(
        "forever".parse::<PersistenceMode>(),
        Err(Error::InvalidPersistenceMode(_))
    ));
}
