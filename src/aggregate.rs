//! Roster classification by today's status.

use std::collections::{HashMap, HashSet};

use crate::day::DayKey;
use crate::models::roster::{Breakdown, BucketEntry, RosterMember};
use crate::models::status::{Bucket, StatusRecord, WorkStatus};

/// Sort every roster member into exactly one bucket.
///
/// Members with a record land in their status bucket; everyone else lands
/// in [`Bucket::NoResponse`]. Records for users who are not on the roster
/// (people who left the channel, excluded accounts) are ignored, and a user
/// listed twice is only counted once. Members keep their roster order
/// within each bucket.
#[must_use]
pub fn classify(day: DayKey, roster: &[RosterMember], records: &[StatusRecord]) -> Breakdown {
    let by_user: HashMap<&str, WorkStatus> = records
        .iter()
        .map(|record| (record.user_id.as_str(), record.status))
        .collect();

    let mut buckets: Vec<BucketEntry> = Bucket::ORDER
        .iter()
        .map(|bucket| BucketEntry {
            bucket: *bucket,
            members: Vec::new(),
        })
        .collect();

    let mut seen = HashSet::new();
    for member in roster {
        if !seen.insert(member.user_id.as_str()) {
            continue;
        }
        let bucket = by_user
            .get(member.user_id.as_str())
            .map_or(Bucket::NoResponse, |status| Bucket::Status(*status));
        if let Some(entry) = buckets.iter_mut().find(|entry| entry.bucket == bucket) {
            entry.members.push(member.clone());
        }
    }

    Breakdown { day, buckets }
}
