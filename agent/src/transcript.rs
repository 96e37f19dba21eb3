use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use vision_agent_common::event::Role;

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    pub at_ms: i64,
}

/// Conversation history for one agent session, written out as JSON when the
/// session ends.
#[derive(Debug, Serialize)]
pub struct Transcript {
    room: String,
    started_at: DateTime<Utc>,
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new(room: &str) -> Self {
        Self {
            room: room.to_string(),
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, role: Role, text: String, at_ms: i64) {
        self.entries.push(TranscriptEntry { role, text, at_ms });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn file_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("transcript_{}.json", self.room))
    }

    /// Write `transcript_{room}.json` into `dir`, pretty-printed.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, TranscriptError> {
        let path = self.file_path(dir);
        let json = serde_json::to_string_pretty(self).map_err(TranscriptError::Serialize)?;
        std::fs::write(&path, json)
            .map_err(|e| TranscriptError::Write(path.display().to_string(), e))?;
        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("failed to serialize transcript: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write transcript to {0}: {1}")]
    Write(String, std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_arrival_order() {
        let mut transcript = Transcript::new("workout-42");
        transcript.record(Role::Assistant, "What workout today?".to_string(), 100);
        transcript.record(Role::User, "Leg day".to_string(), 2500);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.entries[0].text, "What workout today?");
        assert_eq!(transcript.entries[1].role, Role::User);
    }

    #[test]
    fn writes_named_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut transcript = Transcript::new("workout-42");
        transcript.record(Role::User, "done".to_string(), 9000);

        let path = transcript.write(dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "transcript_workout-42.json"
        );

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["room"], "workout-42");
        assert_eq!(value["entries"][0]["role"], "user");
        assert_eq!(value["entries"][0]["text"], "done");
        assert_eq!(value["entries"][0]["at_ms"], 9000);
    }

    #[test]
    fn empty_transcript_still_writes() {
        let dir = tempfile::tempdir().unwrap();
        let transcript = Transcript::new("quiet-room");
        let path = transcript.write(dir.path()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["entries"].as_array().unwrap().is_empty());
    }

    #[test]
    fn unwritable_dir_is_an_error() {
        let transcript = Transcript::new("workout-42");
        let result = transcript.write(Path::new("/nonexistent-dir-for-test"));
        assert!(matches!(result, Err(TranscriptError::Write(_, _))));
    }
}
