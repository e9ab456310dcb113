//! Calendar dates as they appear in the tracked file and in commit metadata.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use super::error::CoreError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A `YYYY-MM-DD` calendar date.
///
/// Commit dates and entry dates live in the same space and are compared
/// directly against each other and against the replay cutover constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalDate(Date);

impl CalDate {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Date::parse(s, DATE_FORMAT)
            .map(Self)
            .map_err(|_| CoreError::DateFormat(s.to_owned()))
    }

    pub fn date(self) -> Date {
        self.0
    }
}

impl From<Date> for CalDate {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(DATE_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl Serialize for CalDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CalDate::parse(&s).map_err(serde::de::Error::custom)
    }
}
