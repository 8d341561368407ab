//! Work-location status model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::day::DayKey;

/// Button value that opens the roster modal instead of recording a status.
pub const LIST_VALUE: &str = "list";

/// Where a member is working today.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Working from the head office.
    Office,
    /// Working from home.
    Remote,
    /// Working at a client site or secondment location.
    OffSite,
    /// Finished for the day.
    Left,
}

impl WorkStatus {
    /// All statuses in board display order.
    pub const ALL: [Self; 4] = [Self::Office, Self::Remote, Self::OffSite, Self::Left];

    /// Stable code stored in the database and carried as the button value.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Remote => "remote",
            Self::OffSite => "off_site",
            Self::Left => "left",
        }
    }

    /// Parse a stored status code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    /// Human-readable label with its emoji.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Office => "\u{1f3e2} Office",
            Self::Remote => "\u{1f3e1} Remote",
            Self::OffSite => "\u{1f697} Off-site",
            Self::Left => "\u{1f44b} Left for the day",
        }
    }

    /// Short label used on board buttons.
    #[must_use]
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Office => "\u{1f3e2} Office",
            Self::Remote => "\u{1f3e1} Remote",
            Self::OffSite => "\u{1f697} Off-site",
            Self::Left => "\u{1f44b} Leave",
        }
    }

    /// Block Kit `action_id` of the status button.
    #[must_use]
    pub fn action_id(self) -> &'static str {
        match self {
            Self::Office => "button_office",
            Self::Remote => "button_remote",
            Self::OffSite => "button_off_site",
            Self::Left => "button_left",
        }
    }
}

/// A roster bucket: one explicit status or the implicit "no response".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Member reported this status today.
    Status(WorkStatus),
    /// Member has no record for today.
    NoResponse,
}

impl Bucket {
    /// Fixed display order for the roster breakdown.
    pub const ORDER: [Self; 5] = [
        Self::Status(WorkStatus::Office),
        Self::Status(WorkStatus::Remote),
        Self::Status(WorkStatus::OffSite),
        Self::Status(WorkStatus::Left),
        Self::NoResponse,
    ];

    /// Human-readable label with its emoji.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Status(status) => status.label(),
            Self::NoResponse => "\u{1f4a4} No response",
        }
    }
}

/// What a board button asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    /// Record the clicking user's status.
    SetStatus(WorkStatus),
    /// Open the roster modal.
    ShowRoster,
}

impl BoardAction {
    /// Interpret a button `value`.
    ///
    /// Besides the canonical codes, the Japanese values used by boards
    /// posted by the earlier deployment are still understood.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            LIST_VALUE | "一覧" => Some(Self::ShowRoster),
            "本社" => Some(Self::SetStatus(WorkStatus::Office)),
            "在宅" => Some(Self::SetStatus(WorkStatus::Remote)),
            "出先" => Some(Self::SetStatus(WorkStatus::OffSite)),
            "退勤" => Some(Self::SetStatus(WorkStatus::Left)),
            other => WorkStatus::from_code(other).map(Self::SetStatus),
        }
    }
}

/// One member's status in one channel on one day.
///
/// At most one record exists per `(user_id, channel_id, day)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    /// Unique record identifier (UUID v4).
    pub id: String,
    /// Slack user ID of the member.
    pub user_id: String,
    /// Slack channel ID the board lives in.
    pub channel_id: String,
    /// Day the status applies to.
    pub day: DayKey,
    /// Reported status.
    pub status: WorkStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

impl StatusRecord {
    /// Construct a new record with a generated identifier.
    #[must_use]
    pub fn new(user_id: String, channel_id: String, day: DayKey, status: WorkStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            channel_id,
            day,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Number of records per status for one channel and day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    office: u32,
    remote: u32,
    off_site: u32,
    left: u32,
}

impl StatusCounts {
    /// Count for a single status.
    #[must_use]
    pub fn get(&self, status: WorkStatus) -> u32 {
        match status {
            WorkStatus::Office => self.office,
            WorkStatus::Remote => self.remote,
            WorkStatus::OffSite => self.off_site,
            WorkStatus::Left => self.left,
        }
    }

    /// Set the count for a status.
    pub fn set(&mut self, status: WorkStatus, count: u32) {
        let slot = match status {
            WorkStatus::Office => &mut self.office,
            WorkStatus::Remote => &mut self.remote,
            WorkStatus::OffSite => &mut self.off_site,
            WorkStatus::Left => &mut self.left,
        };
        *slot = count;
    }

    /// Sum over all statuses.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.office + self.remote + self.off_site + self.left
    }
}

/// Result of reconciling a click against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed; one was inserted.
    Created,
    /// The existing record held a different status and was changed.
    Updated,
    /// The existing record already held this status.
    Unchanged,
}
