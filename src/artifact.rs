//! Persisted artifact formats.
//!
//! Three JSON files form the external contract with the UI and storage
//! layers; their exact shapes (tuple pairs, string-keyed id map, literal
//! status labels) must round-trip unchanged.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::{HistoryMap, Snapshot};
use crate::merge::LatestRecord;

/// Snapshot sequence, reconciled or raw depending on stage.
pub const HISTORY_FILE: &str = "history.json";
/// String-encoded id → ordered `[label, date]` pairs.
pub const CALC_HISTORY_FILE: &str = "calc_history.json";
/// Current entries enriched with `date` and `history`.
pub const LATEST_FILE: &str = "latest.json";

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ArtifactError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unparsable artifact {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn write_json<T: Serialize>(dir: &Path, file: &str, value: &T) -> Result<PathBuf, ArtifactError> {
    fs::create_dir_all(dir).map_err(|source| ArtifactError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file);
    let handle = File::create(&path).map_err(|source| ArtifactError::Write {
        path: path.clone(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(handle), value).map_err(|source| {
        ArtifactError::Encode {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}

/// Write the snapshot sequence to `history.json`.
pub fn write_history(dir: &Path, snapshots: &[Snapshot]) -> Result<PathBuf, ArtifactError> {
    write_json(dir, HISTORY_FILE, &snapshots)
}

/// Read a previously written `history.json` back.
pub fn read_history(dir: &Path) -> Result<Vec<Snapshot>, ArtifactError> {
    let path = dir.join(HISTORY_FILE);
    let handle = File::open(&path).map_err(|source| ArtifactError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(handle))
        .map_err(|source| ArtifactError::Decode { path, source })
}

/// `calc_history.json` body: ids as string keys, in numeric order.
struct CalcHistory<'a>(&'a HistoryMap);

impl Serialize for CalcHistory<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, history) in self.0 {
            map.serialize_entry(&id.to_string(), history)?;
        }
        map.end()
    }
}

/// Write the history map to `calc_history.json`.
pub fn write_calc_history(dir: &Path, histories: &HistoryMap) -> Result<PathBuf, ArtifactError> {
    write_json(dir, CALC_HISTORY_FILE, &CalcHistory(histories))
}

/// Write the merged records to `latest.json`.
pub fn write_latest(dir: &Path, records: &[LatestRecord]) -> Result<PathBuf, ArtifactError> {
    write_json(dir, LATEST_FILE, &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalDate, CommitInfo, EntryId, History, Status, Transition};

    fn d(s: &str) -> CalDate {
        CalDate::parse(s).unwrap()
    }

    #[test]
    fn history_artifact_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let snapshots = vec![Snapshot {
            commit: CommitInfo {
                id: "abc123".to_owned(),
                date: d("2024-11-18"),
            },
            entries: serde_json::from_str(
                r#"[{"id": 1, "name": "任務A", "date": "2024-01-05", "status": "進行中"}]"#,
            )
            .unwrap(),
        }];

        write_history(dir.path(), &snapshots).unwrap();
        let back = read_history(dir.path()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].commit, snapshots[0].commit);
        assert_eq!(back[0].entries[0].id, EntryId::from_int(1));
    }

    #[test]
    fn calc_history_uses_string_keys_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut histories = HistoryMap::new();
        for id in [EntryId::from_int(10), EntryId::from_int(2), EntryId::from_parts(2, 5)] {
            histories.insert(
                id,
                History::seeded(vec![Transition::new(Status::NotStarted, d("2024-01-01"))]),
            );
        }

        let path = write_calc_history(dir.path(), &histories).unwrap();
        let text = fs::read_to_string(path).unwrap();

        // Numeric key order, not lexicographic.
        let pos = |key: &str| text.find(key).unwrap();
        assert!(pos("\"2\"") < pos("\"2.5\""));
        assert!(pos("\"2.5\"") < pos("\"10\""));
        // Labels round-trip byte-identically.
        assert!(text.contains("未開始"));
    }

    #[test]
    fn read_history_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_history(dir.path()),
            Err(ArtifactError::Read { .. })
        ));

        fs::write(dir.path().join(HISTORY_FILE), "not json").unwrap();
        assert!(matches!(
            read_history(dir.path()),
            Err(ArtifactError::Decode { .. })
        ));
    }
}
