//! The canonical penalty status set and both raw encodings.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::CoreError;

/// The five lifecycle states a penalty can be in, in ascending order of
/// progress. The discriminant order matches the numeric state codes the
/// downstream storage layer uses (0..=4), so `as u8` is the external code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Inactive,
    NotStarted,
    InProgress,
    BarelyDone,
    Completed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Inactive,
        Status::NotStarted,
        Status::InProgress,
        Status::BarelyDone,
        Status::Completed,
    ];

    /// The literal label used in every persisted artifact. Part of the
    /// external contract; must round-trip unchanged.
    pub fn label(self) -> &'static str {
        match self {
            Status::Inactive => "未生效",
            Status::NotStarted => "未開始",
            Status::InProgress => "進行中",
            Status::BarelyDone => "勉強過",
            Status::Completed => "已完成",
        }
    }

    pub fn from_label(label: &str) -> Result<Self, CoreError> {
        match label {
            "未生效" => Ok(Status::Inactive),
            "未開始" => Ok(Status::NotStarted),
            "進行中" => Ok(Status::InProgress),
            "勉強過" => Ok(Status::BarelyDone),
            "已完成" => Ok(Status::Completed),
            other => Err(CoreError::UnknownStatusLabel(other.to_owned())),
        }
    }

    /// The early encoding: a small integer `done` code.
    pub fn from_done_code(code: u64) -> Result<Self, CoreError> {
        match code {
            0 => Ok(Status::NotStarted),
            1 => Ok(Status::Completed),
            2 => Ok(Status::BarelyDone),
            3 => Ok(Status::InProgress),
            other => Err(CoreError::UnknownDoneCode(other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Status::from_label(&label).map_err(serde::de::Error::custom)
    }
}
