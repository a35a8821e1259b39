//! Reading log snapshots exported by the dashboard
//!
//! A snapshot file is either a bare JSON array of training logs, or an object
//! with `logs` and an optional `user`. Logs whose fields fall outside the
//! accepted entry ranges are dropped on load.

use crate::error::{PerfSciError, Result};
use crate::models::{TrainingLog, User};
use crate::validation::TrainingInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub user: Option<User>,

    #[serde(default)]
    pub logs: Vec<TrainingLog>,

    /// Logs dropped for out-of-range fields
    #[serde(skip)]
    pub rejected: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Logs(Vec<TrainingLog>),
    Full(Snapshot),
}

impl Snapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut snapshot = match serde_json::from_str::<SnapshotFile>(json) {
            Ok(SnapshotFile::Logs(logs)) => Snapshot {
                logs,
                ..Default::default()
            },
            Ok(SnapshotFile::Full(snapshot)) => snapshot,
            // Retry as the object form so the error names the offending field
            Err(_) => serde_json::from_str::<Snapshot>(json)?,
        };

        let before = snapshot.logs.len();
        snapshot.logs.retain(|log| match TrainingInput::from(log).validate() {
            Ok(()) => true,
            Err(reason) => {
                warn!(id = %log.id, field = reason.field(), %reason, "Dropping out-of-range log");
                false
            }
        });
        snapshot.rejected = before - snapshot.logs.len();

        Ok(snapshot)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PerfSciError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            logs = snapshot.logs.len(),
            has_user = snapshot.user.is_some(),
            rejected = snapshot.rejected,
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Logs owned by `athlete_id`, newest first
    pub fn logs_for_athlete(&self, athlete_id: &str) -> Vec<TrainingLog> {
        let mut logs: Vec<TrainingLog> = self
            .logs
            .iter()
            .filter(|log| log.athlete_id == athlete_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs
    }
}

/// Parse an RFC 3339 timestamp supplied on the command line
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PerfSciError::Parse {
            field: field.to_string(),
            reason: format!("'{}' is not an RFC 3339 timestamp ({})", value, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LOGS: &str = r#"[
        {"id":"a","athleteId":"ath-1","date":"2024-06-01T08:00:00Z","duration":60,"intensity":5},
        {"id":"b","athleteId":"ath-2","date":"2024-06-02T08:00:00Z","duration":30,"intensity":8},
        {"id":"c","athleteId":"ath-1","date":"2024-06-03T08:00:00Z","duration":45,"intensity":6}
    ]"#;

    #[test]
    fn test_bare_log_array() {
        let snapshot = Snapshot::from_json_str(LOGS).unwrap();
        assert!(snapshot.user.is_none());
        assert_eq!(snapshot.logs.len(), 3);

        let mine = snapshot.logs_for_athlete("ath-1");
        let ids: Vec<_> = mine.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_full_snapshot_file() {
        let json = format!(
            r#"{{"user":{{"id":"ath-1","joinedAt":"2024-05-01T00:00:00Z"}},"logs":{}}}"#,
            LOGS
        );
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let snapshot = Snapshot::from_json_file(file.path()).unwrap();
        assert_eq!(snapshot.user.unwrap().id, "ath-1");
        assert_eq!(snapshot.logs.len(), 3);
    }

    #[test]
    fn test_out_of_range_logs_are_dropped() {
        let mut json = String::from("[");
        for day in 1..=14 {
            if day > 1 {
                json.push(',');
            }
            json.push_str(&format!(
                r#"{{"id":"x{day}","athleteId":"ath-1","date":"2024-06-{day:02}T08:00:00Z","duration":1e20,"intensity":1e10}}"#
            ));
        }
        json.push_str(r#",{"id":"ok","athleteId":"ath-1","date":"2024-06-15T08:00:00Z","duration":60,"intensity":5}]"#);

        let snapshot = Snapshot::from_json_str(&json).unwrap();
        assert_eq!(snapshot.rejected, 14);
        assert_eq!(snapshot.logs.len(), 1);
        assert_eq!(snapshot.logs[0].id, "ok");

        let now = parse_timestamp("now", "2024-06-20T00:00:00Z").unwrap();
        let insight = crate::calculate_acwr(&snapshot.logs, now);
        assert_eq!(insight.value, "Calibration");
    }

    #[test]
    fn test_missing_file() {
        let err = Snapshot::from_json_file("/nonexistent/logs.json").unwrap_err();
        assert!(matches!(err, PerfSciError::FileNotFound { .. }));
    }

    #[test]
    fn test_malformed_snapshot() {
        let err = Snapshot::from_json_str(r#"{"logs":[{"id":"x"}]}"#).unwrap_err();
        assert!(matches!(err, PerfSciError::Json(_)));
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("now", "2024-06-30T12:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-06-30T10:00:00+00:00");

        let err = parse_timestamp("now", "yesterday").unwrap_err();
        assert!(matches!(err, PerfSciError::Parse { .. }));
    }
}
