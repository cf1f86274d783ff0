pub mod scoring;
pub mod status;

pub use scoring::{
    score_on_correct, score_on_wrong, CorrectInput, QuizType, WrongInput, WrongOutcome,
};
pub use status::{classify, color_for, LearningStatus, Rgb};
