//! Calendar day keys in a fixed UTC offset.
//!
//! Every status record is scoped to a [`DayKey`]. The key is recomputed on
//! each request so that day boundaries are honoured while the server runs.
//! Board messages embed the same `YYYY/MM/DD` token in their text, which is
//! how a click on an old message is told apart from a click on today's.

use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use regex::Regex;

use crate::{AppError, Result};

const KEY_FORMAT: &str = "%Y/%m/%d";

const WEEKDAY_FORMAT: &str = "%Y/%m/%d (%a)";

static DATE_TOKEN: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

fn date_token() -> Result<&'static Regex> {
    DATE_TOKEN
        .get_or_init(|| Regex::new("[0-9]{4}/[0-9]{2}/[0-9]{2}"))
        .as_ref()
        .map_err(|err| AppError::Config(format!("invalid date token pattern: {err}")))
}

/// Canonical `YYYY/MM/DD` key for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Today's key in the given UTC offset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the offset is out of range.
    pub fn today(utc_offset_hours: i32) -> Result<Self> {
        Self::at(Utc::now(), utc_offset_hours)
    }

    /// Key of the day containing `instant` in the given UTC offset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the offset is out of range.
    pub fn at(instant: DateTime<Utc>, utc_offset_hours: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
            .ok_or_else(|| AppError::Config(format!("invalid utc offset: {utc_offset_hours}h")))?;
        Ok(Self(instant.with_timezone(&offset).date_naive()))
    }

    /// Wrap an explicit calendar date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a stored `YYYY/MM/DD` key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the value is not a valid key.
    pub fn parse(raw: &str) -> Result<Self> {
        NaiveDate::parse_from_str(raw, KEY_FORMAT)
            .map(Self)
            .map_err(|err| AppError::Db(format!("invalid day key {raw:?}: {err}")))
    }

    /// Find the first date token embedded in message text.
    ///
    /// Yields `None` when the text carries no token or the token is not a
    /// real calendar date (e.g. `2024/13/45`). Only ASCII digits form a
    /// token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the token pattern cannot be compiled.
    pub fn extract(text: &str) -> Result<Option<Self>> {
        let Some(token) = date_token()?.find(text) else {
            return Ok(None);
        };
        Ok(NaiveDate::parse_from_str(token.as_str(), KEY_FORMAT)
            .ok()
            .map(Self))
    }

    /// Underlying calendar date.
    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Key rendered with its short weekday, e.g. `2024/12/05 (Thu)`.
    #[must_use]
    pub fn with_weekday(self) -> String {
        self.0.format(WEEKDAY_FORMAT).to_string()
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}
