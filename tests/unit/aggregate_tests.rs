//! Unit tests for roster classification.

use chrono::{NaiveDate, Utc};

use presence_board::aggregate::classify;
use presence_board::day::DayKey;
use presence_board::models::roster::RosterMember;
use presence_board::models::status::{Bucket, StatusRecord, WorkStatus};

fn today() -> DayKey {
    DayKey::from_date(NaiveDate::from_ymd_opt(2024, 12, 5).expect("date"))
}

fn member(id: &str, name: &str) -> RosterMember {
    RosterMember {
        user_id: id.to_owned(),
        display_name: name.to_owned(),
    }
}

fn record(user: &str, status: WorkStatus) -> StatusRecord {
    StatusRecord::new(user.to_owned(), "C1".to_owned(), today(), status)
}

fn names(members: &[RosterMember]) -> Vec<&str> {
    members.iter().map(|m| m.display_name.as_str()).collect()
}

#[test]
fn members_without_record_have_no_response() {
    let roster = vec![
        member("U1", "Alice"),
        member("U2", "Bob"),
        member("U3", "Carol"),
    ];
    let records = vec![record("U1", WorkStatus::Office)];

    let breakdown = classify(today(), &roster, &records);

    assert_eq!(
        names(breakdown.members(Bucket::Status(WorkStatus::Office))),
        vec!["Alice"]
    );
    assert_eq!(
        names(breakdown.members(Bucket::NoResponse)),
        vec!["Bob", "Carol"]
    );
    assert_eq!(breakdown.total(), 3);
}

#[test]
fn every_member_lands_in_exactly_one_bucket() {
    let roster: Vec<RosterMember> = (1..=6)
        .map(|n| member(&format!("U{n}"), &format!("Member {n}")))
        .collect();
    let records = vec![
        record("U1", WorkStatus::Office),
        record("U2", WorkStatus::Remote),
        record("U3", WorkStatus::OffSite),
        record("U4", WorkStatus::Left),
    ];

    let breakdown = classify(today(), &roster, &records);

    assert_eq!(breakdown.total(), roster.len());
    assert_eq!(
        breakdown.members(Bucket::NoResponse).len(),
        roster.len() - records.len()
    );
    for status in WorkStatus::ALL {
        assert_eq!(breakdown.members(Bucket::Status(status)).len(), 1);
    }
}

#[test]
fn buckets_follow_display_order() {
    let breakdown = classify(today(), &[], &[]);

    let order: Vec<Bucket> = breakdown.buckets.iter().map(|e| e.bucket).collect();
    assert_eq!(order, Bucket::ORDER.to_vec());
    assert_eq!(breakdown.day, today());
}

#[test]
fn records_for_absent_members_are_ignored() {
    let roster = vec![member("U1", "Alice")];
    let records = vec![
        record("U1", WorkStatus::Remote),
        record("U9", WorkStatus::Office),
    ];

    let breakdown = classify(today(), &roster, &records);

    assert!(breakdown
        .members(Bucket::Status(WorkStatus::Office))
        .is_empty());
    assert_eq!(breakdown.total(), 1);
}

#[test]
fn duplicate_roster_entries_count_once() {
    let roster = vec![member("U1", "Alice"), member("U1", "Alice")];

    let breakdown = classify(today(), &roster, &[]);

    assert_eq!(breakdown.total(), 1);
}

#[test]
fn roster_order_is_kept_within_a_bucket() {
    let roster = vec![
        member("U2", "Bob"),
        member("U1", "Alice"),
        member("U3", "Carol"),
    ];
    let mut late = record("U1", WorkStatus::Office);
    late.created_at = Utc::now();
    let records = vec![
        late,
        record("U2", WorkStatus::Office),
        record("U3", WorkStatus::Office),
    ];

    let breakdown = classify(today(), &roster, &records);

    assert_eq!(
        names(breakdown.members(Bucket::Status(WorkStatus::Office))),
        vec!["Bob", "Alice", "Carol"]
    );
}
