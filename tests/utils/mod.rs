use affil_net::{AffiliationRecord, RecordBatch, records_to_batch};
use chrono::NaiveDate;

/// Build a date, panicking on invalid input
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Owned member ids
#[must_use]
pub fn names(members: &[&str]) -> Vec<String> {
    members.iter().map(|m| (*m).to_string()).collect()
}

/// Affiliation table from records
#[must_use]
pub fn affiliations(records: &[AffiliationRecord]) -> RecordBatch {
    records_to_batch(records).unwrap()
}

/// Open-ended affiliation starting 2020-01-01
#[must_use]
pub fn open(member: &str, org: &str) -> AffiliationRecord {
    AffiliationRecord::new(member, org, date(2020, 1, 1), None)
}

/// Two members overlapping in Org1 during January 2020
#[must_use]
pub fn two_member_table() -> RecordBatch {
    affiliations(&[
        AffiliationRecord::new("M1", "Org1", date(2020, 1, 1), Some(date(2020, 2, 1))),
        AffiliationRecord::new("M2", "Org1", date(2020, 1, 15), Some(date(2020, 2, 15))),
    ])
}

/// A hub sharing one organization with each of three leaves
///
/// Degrees are H=3 and A=B=C=1.
#[must_use]
pub fn star_table() -> RecordBatch {
    affiliations(&[
        open("H", "Org1"),
        open("A", "Org1"),
        open("H", "Org2"),
        open("B", "Org2"),
        open("H", "Org3"),
        open("C", "Org3"),
    ])
}
