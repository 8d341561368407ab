//! Channel roster and per-bucket breakdown types.

use crate::day::DayKey;
use crate::models::status::Bucket;

/// Display name used when a member's profile could not be fetched.
pub const PLACEHOLDER_NAME: &str = "ERROR";

/// Display name used when a profile carries no usable name.
pub const UNKNOWN_NAME: &str = "Unknown User";

/// Profile fields the roster needs from the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    /// Slack user ID.
    pub user_id: String,
    /// Resolved display name.
    pub display_name: String,
    /// Whether Slack flags the account as a bot.
    pub is_bot: bool,
    /// Whether the account has been deactivated.
    pub deleted: bool,
}

impl MemberProfile {
    /// Pick the best available name: display name, then real name, then
    /// account name, then [`UNKNOWN_NAME`].
    #[must_use]
    pub fn pick_name(
        display_name: Option<&str>,
        real_name: Option<&str>,
        account_name: Option<&str>,
    ) -> String {
        [display_name, real_name, account_name]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_NAME)
            .to_owned()
    }

    /// Whether the profile belongs to a person who should be on the roster.
    #[must_use]
    pub fn is_human(&self) -> bool {
        !self.is_bot && !self.deleted
    }
}

/// A human member of the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterMember {
    /// Slack user ID.
    pub user_id: String,
    /// Name shown in the roster modal.
    pub display_name: String,
}

impl RosterMember {
    /// Member whose profile lookup failed.
    #[must_use]
    pub fn placeholder(user_id: String) -> Self {
        Self {
            user_id,
            display_name: PLACEHOLDER_NAME.to_owned(),
        }
    }
}

impl From<MemberProfile> for RosterMember {
    fn from(profile: MemberProfile) -> Self {
        Self {
            user_id: profile.user_id,
            display_name: profile.display_name,
        }
    }
}

/// Members that fell into one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEntry {
    /// Which bucket.
    pub bucket: Bucket,
    /// Members in roster order.
    pub members: Vec<RosterMember>,
}

impl BucketEntry {
    /// Number of members in the bucket.
    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Classification of a whole roster for one channel and day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    /// Day the breakdown describes.
    pub day: DayKey,
    /// One entry per bucket, in [`Bucket::ORDER`].
    pub buckets: Vec<BucketEntry>,
}

impl Breakdown {
    /// Members in a given bucket; empty when the bucket is absent.
    #[must_use]
    pub fn members(&self, bucket: Bucket) -> &[RosterMember] {
        self.buckets
            .iter()
            .find(|entry| entry.bucket == bucket)
            .map_or(&[], |entry| entry.members.as_slice())
    }

    /// Total members across all buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(BucketEntry::count).sum()
    }
}
