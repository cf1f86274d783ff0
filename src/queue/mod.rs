use serde::{Serialize, Deserialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Consecutive misses after which a study break is suggested.
pub const BREAK_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("cannot {operation} on a completed queue")]
    Empty { operation: &'static str },
}

/// Session counters. Never decrease within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueStats {
    pub correct: u32,
    pub wrong: u32,
    pub total: u32,
}

/// Ordered study queue for one session.
///
/// Every transition returns a new state; the head of `queue` is the current
/// item. A wrong answer moves the head to the tail, a correct answer moves it
/// into `answered`. Items are conserved: `queue.len() + answered.len()` is
/// always the initial length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueState<W> {
    queue: VecDeque<W>,
    answered: Vec<W>,
    consecutive_wrong: u32,
    consecutive_correct: u32,
    stats: QueueStats,
}

impl<W> Default for QueueState<W> {
    fn default() -> Self {
        QueueState {
            queue: VecDeque::new(),
            answered: Vec::new(),
            consecutive_wrong: 0,
            consecutive_correct: 0,
            stats: QueueStats::default(),
        }
    }
}

impl<W: Clone> QueueState<W> {
    /// Start a session from an already shuffled and limited word set.
    pub fn initialize<I>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
    {
        QueueState {
            queue: words.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<&W> {
        self.queue.front()
    }

    /// Resolve the current item permanently.
    pub fn record_correct(&self) -> Result<Self, QueueError> {
        let mut next = self.clone();
        let word = next
            .queue
            .pop_front()
            .ok_or(QueueError::Empty { operation: "record_correct" })?;
        next.answered.push(word);
        next.stats.correct += 1;
        next.stats.total += 1;
        next.consecutive_correct += 1;
        next.consecutive_wrong = 0;
        Ok(next)
    }

    /// Requeue the current item at the tail. A single-item queue keeps asking the same item.
    pub fn record_wrong(&self) -> Result<Self, QueueError> {
        let mut next = self.clone();
        let word = next
            .queue
            .pop_front()
            .ok_or(QueueError::Empty { operation: "record_wrong" })?;
        next.queue.push_back(word);
        next.stats.wrong += 1;
        next.stats.total += 1;
        next.consecutive_wrong += 1;
        next.consecutive_correct = 0;
        Ok(next)
    }
}

impl<W> QueueState<W> {
    pub fn needs_break(&self) -> bool {
        self.needs_break_after(BREAK_THRESHOLD)
    }

    pub fn needs_break_after(&self, threshold: u32) -> bool {
        self.consecutive_wrong >= threshold
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
    }

    /// Share of the original word set answered correctly, rounded to a whole percent.
    pub fn progress_percent(&self, total_words: usize) -> u8 {
        if total_words == 0 {
            return 0;
        }
        let percent = self.answered.len() as f64 / total_words as f64 * 100.0;
        percent.round().min(100.0) as u8
    }

    pub fn queue(&self) -> &VecDeque<W> {
        &self.queue
    }

    pub fn answered(&self) -> &[W] {
        &self.answered
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn consecutive_wrong(&self) -> u32 {
        self.consecutive_wrong
    }

    pub fn consecutive_correct(&self) -> u32 {
        self.consecutive_correct
    }

    pub fn stats(&self) -> QueueStats {
        self.stats
    }
}
