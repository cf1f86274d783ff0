use std::collections::{HashMap, HashSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::error::VocaError;
use crate::learning::scoring::{score_on_correct, score_on_wrong, CorrectInput, QuizType, WrongInput};
use crate::learning::status::LearningStatus;
use crate::queue::{QueueError, QueueState, QueueStats, BREAK_THRESHOLD};
use crate::sessions::SessionRecord;
use crate::words::model::Word;
use crate::words::store::WordStore;

/// How the current question was presented, as tracked by the quiz flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnswerContext {
    /// The question is an AI-paraphrased variant instead of the original.
    pub is_ai_similar: bool,
}

/// Result of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerReport {
    /// Word with its updated rate and stats, ready to persist.
    pub word: Word,
    pub correct: bool,
    pub is_reasked: bool,
    pub previous_rate: u8,
    pub new_rate: u8,
    pub status: LearningStatus,
    /// Signed penalty for a wrong answer.
    pub penalty: Option<i64>,
    pub needs_break: bool,
    pub complete: bool,
}

/// One quiz run: the queue of word ids plus the words being scored.
///
/// Owned by a single session controller. Words answered wrong are
/// remembered so a later correct answer is scored as a re-ask.
#[derive(Debug, Clone)]
pub struct StudySession {
    id: String,
    quiz_type: QuizType,
    break_threshold: u32,
    queue: QueueState<String>,
    words: HashMap<String, Word>,
    missed: HashSet<String>,
    total_words: usize,
    started_at: DateTime<Utc>,
}

impl StudySession {
    /// Start a session over an already selected word set. Duplicate ids keep the first occurrence.
    pub fn start(words: Vec<Word>, quiz_type: QuizType) -> Self {
        let started_at = Utc::now();
        let mut order = Vec::with_capacity(words.len());
        let mut by_id = HashMap::with_capacity(words.len());
        for word in words {
            if by_id.contains_key(&word.id) {
                tracing::warn!(word_id = %word.id, "Duplicate word in session, skipping");
                continue;
            }
            order.push(word.id.clone());
            by_id.insert(word.id.clone(), word);
        }

        let session = StudySession {
            id: format!("sess_{}", started_at.timestamp_millis()),
            quiz_type,
            break_threshold: BREAK_THRESHOLD,
            total_words: order.len(),
            queue: QueueState::initialize(order),
            words: by_id,
            missed: HashSet::new(),
            started_at,
        };

        tracing::info!(
            session_id = %session.id,
            quiz_type = %quiz_type,
            words = session.total_words,
            "Study session started"
        );
        session
    }

    pub fn with_break_threshold(mut self, threshold: u32) -> Self {
        self.break_threshold = threshold;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn quiz_type(&self) -> QuizType {
        self.quiz_type
    }

    pub fn current(&self) -> Option<&Word> {
        self.queue.current().and_then(|id| self.words.get(id))
    }

    /// Whether the current word was already missed in this session.
    pub fn current_is_reasked(&self) -> bool {
        self.queue
            .current()
            .map(|id| self.missed.contains(id))
            .unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_complete()
    }

    pub fn needs_break(&self) -> bool {
        self.queue.needs_break_after(self.break_threshold)
    }

    pub fn progress_percent(&self) -> u8 {
        self.queue.progress_percent(self.total_words)
    }

    pub fn stats(&self) -> QueueStats {
        self.queue.stats()
    }

    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn queue(&self) -> &QueueState<String> {
        &self.queue
    }

    pub fn answered_words(&self) -> Vec<&Word> {
        self.queue
            .answered()
            .iter()
            .filter_map(|id| self.words.get(id))
            .collect()
    }

    /// Score the current word and advance the queue.
    pub fn answer(&mut self, correct: bool, ctx: AnswerContext) -> Result<AnswerReport, VocaError> {
        let operation = if correct { "record_correct" } else { "record_wrong" };
        let id = self
            .queue
            .current()
            .cloned()
            .ok_or(QueueError::Empty { operation })?;
        let is_reasked = self.missed.contains(&id);

        let mut word = self
            .words
            .get(&id)
            .cloned()
            .ok_or_else(|| VocaError::new(format!("Word missing from session: {}", id), "session"))?;
        let previous_rate = word.learning_rate;
        let mut penalty = None;

        if correct {
            word.learning_rate = score_on_correct(&CorrectInput {
                current_rate: previous_rate as i64,
                quiz_type: self.quiz_type,
                is_reasked,
                is_ai_similar: is_reasked && ctx.is_ai_similar,
                last_penalty: word.stats.last_penalty as i64,
            });
            word.stats.correct_count += 1;
            word.stats.last_penalty = 0;
            self.queue = self.queue.record_correct()?;
        } else {
            let outcome = score_on_wrong(&WrongInput {
                current_rate: previous_rate as i64,
                wrong_count: word.stats.wrong_count as i64,
            });
            word.learning_rate = outcome.new_rate;
            word.stats.wrong_count = word.stats.wrong_count.saturating_add(1);
            word.stats.last_penalty = outcome.magnitude() as u32;
            penalty = Some(outcome.penalty);
            self.missed.insert(id.clone());
            self.queue = self.queue.record_wrong()?;
        }
        word.stats.review_count = word.stats.review_count.saturating_add(1);
        word.stats.last_reviewed_at = Some(Utc::now());
        self.words.insert(id.clone(), word.clone());

        let report = AnswerReport {
            correct,
            is_reasked,
            previous_rate,
            new_rate: word.learning_rate,
            status: word.status(),
            penalty,
            needs_break: self.needs_break(),
            complete: self.is_complete(),
            word,
        };

        tracing::debug!(
            session_id = %self.id,
            word_id = %id,
            correct = correct,
            is_reasked = is_reasked,
            previous_rate = previous_rate,
            new_rate = report.new_rate,
            remaining = self.queue.remaining(),
            "Answer recorded"
        );
        if report.needs_break {
            tracing::info!(
                session_id = %self.id,
                consecutive_wrong = self.queue.consecutive_wrong(),
                "Break suggested"
            );
        }

        Ok(report)
    }

    /// Score the current word and write its progress back to the store.
    /// The session only advances once the write succeeds, so a failed call can be retried.
    pub async fn answer_and_save(
        &mut self,
        store: &WordStore,
        correct: bool,
        ctx: AnswerContext,
    ) -> Result<AnswerReport, VocaError> {
        let mut next = self.clone();
        let report = next.answer(correct, ctx)?;
        if let Err(e) = store
            .save_progress(&report.word.id, report.word.learning_rate, &report.word.stats)
            .await
        {
            tracing::warn!(
                session_id = %self.id,
                word_id = %report.word.id,
                error = %e,
                "Failed to save answer, session not advanced"
            );
            return Err(e);
        }
        *self = next;
        Ok(report)
    }

    /// Close the session and summarise it.
    pub fn finish(self) -> SessionRecord {
        let stats = self.queue.stats();
        let mut missed_word_ids: Vec<String> = self.missed.into_iter().collect();
        missed_word_ids.sort();

        let record = SessionRecord {
            session_id: self.id,
            quiz_type: self.quiz_type,
            total_words: self.total_words,
            correct: stats.correct,
            wrong: stats.wrong,
            total: stats.total,
            answered_word_ids: self.queue.answered().to_vec(),
            missed_word_ids,
            started_at: self.started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            session_id = %record.session_id,
            correct = record.correct,
            wrong = record.wrong,
            completed = record.answered_word_ids.len() == record.total_words,
            "Study session finished"
        );
        record
    }
}
