//! Word and folder documents as stored by the persistence layer.
//!
//! Only `learningRate`, `stats` and `folderId` feed the learning engine;
//! `term` and `meaning` are carried for display and grading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::learning::scoring::clamp_rate;
use crate::learning::status::{classify, LearningStatus};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WordStats {
    #[serde(default)]
    pub wrong_count: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub correct_count: u32,
    /// Magnitude of the most recent penalty, cleared by the next correct answer.
    #[serde(default)]
    pub last_penalty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default, deserialize_with = "deserialize_rate")]
    pub learning_rate: u8,
    #[serde(default)]
    pub stats: WordStats,
    #[serde(default)]
    pub folder_id: Option<String>,
}

impl Word {
    pub fn new<S: Into<String>>(id: S, term: S, meaning: S) -> Self {
        Word {
            id: id.into(),
            term: term.into(),
            meaning: meaning.into(),
            learning_rate: 0,
            stats: WordStats::default(),
            folder_id: None,
        }
    }

    pub fn with_rate(mut self, rate: i64) -> Self {
        self.learning_rate = clamp_rate(rate as f64);
        self
    }

    pub fn in_folder<S: Into<String>>(mut self, folder_id: S) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn status(&self) -> LearningStatus {
        classify(self.learning_rate as i64)
    }
}

/// Accept any JSON number (or null) and fold it into [0, 100].
fn deserialize_rate<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(clamp_rate).unwrap_or(0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    pub fn new<S: Into<String>>(id: S, name: S) -> Self {
        Folder {
            id: id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let word: Word = serde_json::from_str(r#"{"id": "w1"}"#).unwrap();
        assert_eq!(word.learning_rate, 0);
        assert_eq!(word.stats, WordStats::default());
        assert_eq!(word.folder_id, None);
        assert_eq!(word.status(), LearningStatus::Difficult);
    }

    #[test]
    fn test_out_of_range_rate_is_clamped() {
        let word: Word = serde_json::from_str(r#"{"id": "w1", "learningRate": 150}"#).unwrap();
        assert_eq!(word.learning_rate, 100);
        let word: Word = serde_json::from_str(r#"{"id": "w1", "learningRate": -12.5}"#).unwrap();
        assert_eq!(word.learning_rate, 0);
        let word: Word = serde_json::from_str(r#"{"id": "w1", "learningRate": 41.6}"#).unwrap();
        assert_eq!(word.learning_rate, 42);
        let word: Word = serde_json::from_str(r#"{"id": "w1", "learningRate": null}"#).unwrap();
        assert_eq!(word.learning_rate, 0);
    }

    #[test]
    fn test_wire_field_names() {
        let word = Word::new("w1", "ephemeral", "short-lived").with_rate(55).in_folder("f1");
        let json = serde_json::to_value(&word).unwrap();
        assert_eq!(json["learningRate"], 55);
        assert_eq!(json["folderId"], "f1");
        assert_eq!(json["stats"]["wrong_count"], 0);
        assert_eq!(json["stats"]["review_count"], 0);
    }
}
