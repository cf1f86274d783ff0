pub mod session;

pub use session::{AnswerContext, AnswerReport, StudySession};
