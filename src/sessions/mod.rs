use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use std::path::Path;
use crate::error::VocaError;
use crate::learning::scoring::QuizType;

/// Summary of a finished study session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub session_id: String,
    #[serde(default)]
    pub quiz_type: QuizType,
    pub total_words: usize,
    pub correct: u32,
    pub wrong: u32,
    pub total: u32,
    #[serde(default)]
    pub answered_word_ids: Vec<String>,
    #[serde(default)]
    pub missed_word_ids: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Fraction of answers that were correct, 0 when nothing was answered.
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 / self.total as f32
        }
    }
}

/// Save a session record as `<dir>/<session_id>.json`
pub async fn save_session(dir: &Path, record: &SessionRecord) -> Result<(), VocaError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| VocaError::new(
            format!("Failed to create sessions directory: {}", e),
            "io"
        ).with_context(format!("path: {:?}", dir)))?;

    let fname = dir.join(format!("{}.json", record.session_id));
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| VocaError::new(
            format!("Failed to serialize session record: {}", e),
            "json_serialize"
        ))?;

    tokio::fs::write(&fname, json)
        .await
        .map_err(|e| VocaError::new(
            format!("Failed to write session file: {}", e),
            "io"
        ).with_context(format!("path: {:?}", fname)))?;

    tracing::info!(
        session_id = %record.session_id,
        correct = record.correct,
        wrong = record.wrong,
        "Saved session record"
    );
    Ok(())
}

/// Load all session records, oldest first. Unreadable files are skipped.
pub async fn load_all_sessions(dir: &Path) -> Result<Vec<SessionRecord>, VocaError> {
    let mut records = Vec::new();

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(records);
        }
        Err(e) => {
            return Err(VocaError::new(
                format!("Failed to read sessions directory: {}", e),
                "io"
            ).with_context(format!("path: {:?}", dir)));
        }
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                match serde_json::from_str::<SessionRecord>(&text) {
                    Ok(rec) => records.push(rec),
                    Err(e) => {
                        tracing::warn!(
                            path = ?path,
                            error = %e,
                            "Failed to parse session file"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = ?path,
                    error = %e,
                    "Failed to read session file"
                );
            }
        }
    }

    records.sort_by_key(|r| r.finished_at);
    Ok(records)
}

/// Accuracy over the last `n` sessions (records must be oldest first).
/// Returns 0.5 (neutral) when fewer than 3 sessions exist.
pub fn recent_accuracy(records: &[SessionRecord], n: usize) -> f32 {
    let recent: Vec<_> = records.iter().rev().take(n).collect();

    if recent.len() < 3 {
        return 0.5;
    }

    let correct: u32 = recent.iter().map(|r| r.correct).sum();
    let total: u32 = recent.iter().map(|r| r.total).sum();
    if total == 0 {
        return 0.5;
    }
    correct as f32 / total as f32
}
