//! Study core of the VocaLoop vocabulary trainer: the learning-rate engine
//! that scores answers, and the session queue that decides what to ask next.

pub mod analytics;
pub mod config;
pub mod error;
pub mod grading;
pub mod learning;
pub mod logging;
pub mod queue;
pub mod selection;
pub mod sessions;
pub mod state;
pub mod words;

pub use error::VocaError;
pub use learning::{
    classify, color_for, score_on_correct, score_on_wrong, CorrectInput, LearningStatus,
    QuizType, Rgb, WrongInput, WrongOutcome,
};
pub use queue::{QueueError, QueueState, QueueStats};
pub use state::{AnswerContext, AnswerReport, StudySession};
pub use words::{Folder, JsonWordStore, MemoryWordStore, Word, WordStats, WordStore};
