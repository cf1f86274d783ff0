use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use crate::learning::status::LearningStatus;
use crate::words::model::Word;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub difficult: usize,
    pub learning: usize,
    pub memorized: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: LearningStatus) {
        match status {
            LearningStatus::Difficult => self.difficult += 1,
            LearningStatus::Learning => self.learning += 1,
            LearningStatus::Memorized => self.memorized += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.difficult + self.learning + self.memorized
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OverviewPayload {
    pub total_words: usize,
    pub status_counts: StatusCounts,
    pub average_rate: f32,
    /// Keyed by folder id; words without a folder are only in `unfiled_counts`.
    pub folder_counts: HashMap<String, StatusCounts>,
    pub unfiled_counts: StatusCounts,
}

pub fn compute_overview(words: &[Word]) -> OverviewPayload {
    let mut status_counts = StatusCounts::default();
    let mut folder_counts: HashMap<String, StatusCounts> = HashMap::new();
    let mut unfiled_counts = StatusCounts::default();
    let mut rate_sum: u64 = 0;

    for word in words {
        let status = word.status();
        status_counts.add(status);
        rate_sum += word.learning_rate as u64;

        match &word.folder_id {
            Some(folder_id) => folder_counts.entry(folder_id.clone()).or_default().add(status),
            None => unfiled_counts.add(status),
        }
    }

    let average_rate = if words.is_empty() {
        0.0
    } else {
        rate_sum as f32 / words.len() as f32
    };

    OverviewPayload {
        total_words: words.len(),
        status_counts,
        average_rate,
        folder_counts,
        unfiled_counts,
    }
}
