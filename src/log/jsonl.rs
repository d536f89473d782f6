//! JSONL (JSON Lines) transcript of the chat session
//!
//! Provides append-only logging of completed turns to
//! `.sheetchat/transcript.jsonl`

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// One completed conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnRecord {
    /// The turn number within the session (1-indexed)
    pub turn: u32,
    /// Session the turn belongs to
    pub session_id: String,
    /// ISO 8601 timestamp of when the turn completed
    pub timestamp: DateTime<Utc>,
    /// The user's message
    pub prompt: String,
    /// Streaming rounds the turn took (1 when nothing suspended)
    pub rounds: u32,
    /// Every resume decision made during the turn, in resolution order
    pub decisions: Vec<bool>,
    /// Final agent answer, if one was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

/// JSONL logger for the session transcript.
///
/// Each line is a JSON object representing a single completed turn. A write
/// failure is reported by the caller and never aborts the session.
pub struct TranscriptLogger {
    log_path: PathBuf,
}

impl TranscriptLogger {
    /// Create a new transcript logger, creating `log_dir` if needed.
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Result<Self> {
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("transcript.jsonl");

        Ok(Self { log_path })
    }

    /// Append a turn record to the transcript.
    pub fn append(&self, record: &TurnRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open log file: {}", self.log_path.display()))?;

        let json =
            serde_json::to_string(record).context("Failed to serialize turn record to JSON")?;

        writeln!(file, "{json}").context("Failed to write to log file")?;

        Ok(())
    }

    /// Read all turn records from the transcript, in chronological order.
    pub fn read_all(&self) -> Result<Vec<TurnRecord>> {
        // No transcript yet is not an error
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.log_path)
            .with_context(|| format!("Failed to read log file: {}", self.log_path.display()))?;

        let mut records = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let record: TurnRecord = serde_json::from_str(line)
                .with_context(|| format!("Failed to parse line {} as JSON", line_num + 1))?;

            records.push(record);
        }

        Ok(records)
    }

    /// Get the path to the transcript file.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_record(turn: u32, prompt: &str) -> TurnRecord {
        TurnRecord {
            turn,
            session_id: "session-test".to_string(),
            timestamp: Utc::now(),
            prompt: prompt.to_string(),
            rounds: 1,
            decisions: vec![],
            outcome: Some("ok".to_string()),
        }
    }

    #[test]
    fn test_new_logger_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join(".sheetchat");

        let logger = TranscriptLogger::new(&log_dir).unwrap();

        assert!(log_dir.exists());
        assert_eq!(logger.log_path(), log_dir.join("transcript.jsonl"));
    }

    #[test]
    fn test_append_creates_file_and_writes_json() {
        let temp_dir = TempDir::new().unwrap();
        let logger = TranscriptLogger::new(temp_dir.path()).unwrap();

        logger.append(&make_record(1, "hello")).unwrap();

        assert!(logger.log_path().exists());
    }

    #[test]
    fn test_append_multiple_records() {
        let temp_dir = TempDir::new().unwrap();
        let logger = TranscriptLogger::new(temp_dir.path()).unwrap();

        logger.append(&make_record(1, "first")).unwrap();
        logger.append(&make_record(2, "second")).unwrap();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_read_all_empty_log() {
        let temp_dir = TempDir::new().unwrap();
        let logger = TranscriptLogger::new(temp_dir.path()).unwrap();

        let records = logger.read_all().unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_all_returns_records_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let logger = TranscriptLogger::new(temp_dir.path()).unwrap();

        logger.append(&make_record(1, "first")).unwrap();
        logger.append(&make_record(2, "second")).unwrap();

        let records = logger.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].turn, 1);
        assert_eq!(records[0].prompt, "first");
        assert_eq!(records[1].turn, 2);
        assert_eq!(records[1].prompt, "second");
    }

    #[test]
    fn test_round_trip_preserves_decisions() {
        let temp_dir = TempDir::new().unwrap();
        let logger = TranscriptLogger::new(temp_dir.path()).unwrap();

        let original = TurnRecord {
            turn: 3,
            session_id: "session-test".to_string(),
            timestamp: Utc::now(),
            prompt: "update the sheet".to_string(),
            rounds: 2,
            decisions: vec![true, false, true],
            outcome: None,
        };

        logger.append(&original).unwrap();

        let records = logger.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].decisions, vec![true, false, true]);
        assert_eq!(records[0].rounds, 2);
        assert!(records[0].outcome.is_none());
    }
}
