//! Learning-rate updates after a quiz answer.
//!
//! Correct answers earn a reward weighted by quiz type, or recover part of
//! the last penalty when the word is being re-asked. Wrong answers cost a
//! lenient 5 points the first time and escalate with the word's miss count.
//! Every result is rounded and clamped into [0, 100].

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_RATE: i64 = 0;
pub const MAX_RATE: i64 = 100;

const BASE_REWARD: f64 = 12.0;
const AI_SIMILAR_RECOVERY: f64 = 1.0;
const AI_SIMILAR_BONUS: f64 = 3.0;
const REASKED_RECOVERY: f64 = 0.6;

const FIRST_MISS_PENALTY: i64 = -5;
const REPEAT_MISS_PENALTY: i64 = -10;
const MAX_MISS_MULTIPLIER: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizType {
    #[default]
    Multiple,
    Short,
    ToeflComplete,
    /// Any quiz type this crate does not know about.
    #[serde(other)]
    Other,
}

impl QuizType {
    /// Reward multiplier; harder modalities earn more.
    pub fn weight(self) -> f64 {
        match self {
            QuizType::Multiple => 1.0,
            QuizType::Short => 1.4,
            QuizType::ToeflComplete => 1.8,
            QuizType::Other => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuizType::Multiple => "multiple",
            QuizType::Short => "short",
            QuizType::ToeflComplete => "toefl-complete",
            QuizType::Other => "other",
        }
    }
}

impl FromStr for QuizType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "multiple" => QuizType::Multiple,
            "short" => QuizType::Short,
            "toefl-complete" => QuizType::ToeflComplete,
            _ => QuizType::Other,
        })
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round and clamp any intermediate score into the valid rate range.
pub fn clamp_rate(value: f64) -> u8 {
    if value.is_nan() {
        return MIN_RATE as u8;
    }
    value.round().clamp(MIN_RATE as f64, MAX_RATE as f64) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CorrectInput {
    pub current_rate: i64,
    pub quiz_type: QuizType,
    pub is_reasked: bool,
    pub is_ai_similar: bool,
    /// Magnitude of the most recent penalty, 0 if none.
    pub last_penalty: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WrongInput {
    pub current_rate: i64,
    /// Miss count before this answer is recorded.
    pub wrong_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongOutcome {
    pub new_rate: u8,
    /// Signed delta that was applied, always negative.
    pub penalty: i64,
}

impl WrongOutcome {
    /// Penalty size as stored for later recovery.
    pub fn magnitude(&self) -> i64 {
        self.penalty.abs()
    }
}

/// Gain for a correct answer, before it is added to the current rate.
pub fn correct_gain(input: &CorrectInput) -> f64 {
    let last_penalty = input.last_penalty as f64;

    if input.is_ai_similar && input.last_penalty > 0 {
        last_penalty * AI_SIMILAR_RECOVERY + AI_SIMILAR_BONUS
    } else if input.is_reasked && input.last_penalty > 0 {
        last_penalty * REASKED_RECOVERY
    } else {
        BASE_REWARD * input.quiz_type.weight()
    }
}

pub fn score_on_correct(input: &CorrectInput) -> u8 {
    let gain = correct_gain(input);
    let new_rate = clamp_rate(input.current_rate as f64 + gain);
    tracing::debug!(
        current_rate = input.current_rate,
        quiz_type = %input.quiz_type,
        is_reasked = input.is_reasked,
        is_ai_similar = input.is_ai_similar,
        last_penalty = input.last_penalty,
        gain = gain,
        new_rate = new_rate,
        "Scored correct answer"
    );
    new_rate
}

/// Penalty for a wrong answer given the word's earlier miss count.
pub fn wrong_penalty(wrong_count: i64) -> i64 {
    if wrong_count <= 0 {
        FIRST_MISS_PENALTY
    } else {
        REPEAT_MISS_PENALTY * wrong_count.min(MAX_MISS_MULTIPLIER)
    }
}

pub fn score_on_wrong(input: &WrongInput) -> WrongOutcome {
    let penalty = wrong_penalty(input.wrong_count);
    let new_rate = clamp_rate(input.current_rate as f64 + penalty as f64);
    tracing::debug!(
        current_rate = input.current_rate,
        wrong_count = input.wrong_count,
        penalty = penalty,
        new_rate = new_rate,
        "Scored wrong answer"
    );
    WrongOutcome { new_rate, penalty }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correct(current_rate: i64, quiz_type: QuizType) -> CorrectInput {
        CorrectInput { current_rate, quiz_type, ..Default::default() }
    }

    #[test]
    fn test_base_reward_by_quiz_type() {
        assert_eq!(score_on_correct(&correct(50, QuizType::Multiple)), 62);
        // 50 + 16.8
        assert_eq!(score_on_correct(&correct(50, QuizType::Short)), 67);
        // 50 + 21.6
        assert_eq!(score_on_correct(&correct(50, QuizType::ToeflComplete)), 72);
        assert_eq!(score_on_correct(&correct(50, QuizType::Other)), 62);
    }

    #[test]
    fn test_reasked_recovers_sixty_percent() {
        let input = CorrectInput {
            current_rate: 30,
            quiz_type: QuizType::Short,
            is_reasked: true,
            is_ai_similar: false,
            last_penalty: 10,
        };
        assert_eq!(score_on_correct(&input), 36);
    }

    #[test]
    fn test_ai_similar_recovers_fully_with_bonus() {
        let input = CorrectInput {
            current_rate: 30,
            quiz_type: QuizType::Multiple,
            is_reasked: true,
            is_ai_similar: true,
            last_penalty: 10,
        };
        assert_eq!(score_on_correct(&input), 43);
    }

    #[test]
    fn test_recovery_without_penalty_falls_back_to_base() {
        let input = CorrectInput {
            current_rate: 10,
            quiz_type: QuizType::Multiple,
            is_reasked: true,
            is_ai_similar: true,
            last_penalty: 0,
        };
        assert_eq!(score_on_correct(&input), 22);

        let negative = CorrectInput { last_penalty: -8, ..input };
        assert_eq!(score_on_correct(&negative), 22);
    }

    #[test]
    fn test_penalty_escalation_caps_at_three() {
        assert_eq!(wrong_penalty(0), -5);
        assert_eq!(wrong_penalty(1), -10);
        assert_eq!(wrong_penalty(2), -20);
        assert_eq!(wrong_penalty(3), -30);
        assert_eq!(wrong_penalty(10_000), -30);
        assert_eq!(wrong_penalty(-4), -5);
    }

    #[test]
    fn test_wrong_clamps_at_zero() {
        let outcome = score_on_wrong(&WrongInput { current_rate: 0, wrong_count: 0 });
        assert_eq!(outcome.new_rate, 0);
        assert_eq!(outcome.penalty, -5);

        let outcome = score_on_wrong(&WrongInput { current_rate: 20, wrong_count: 2 });
        assert_eq!(outcome, WrongOutcome { new_rate: 0, penalty: -20 });
        assert_eq!(outcome.magnitude(), 20);
    }

    #[test]
    fn test_extreme_inputs_stay_in_range() {
        assert_eq!(score_on_correct(&correct(150, QuizType::ToeflComplete)), 100);
        assert_eq!(score_on_correct(&correct(-40, QuizType::Multiple)), 0);
        assert_eq!(score_on_correct(&correct(i64::MAX, QuizType::Multiple)), 100);
        assert_eq!(score_on_wrong(&WrongInput { current_rate: 150, wrong_count: 10_000 }).new_rate, 100);
        assert_eq!(score_on_wrong(&WrongInput { current_rate: i64::MIN, wrong_count: 1 }).new_rate, 0);
    }

    #[test]
    fn test_quiz_type_parsing() {
        assert_eq!("toefl-complete".parse::<QuizType>().unwrap(), QuizType::ToeflComplete);
        assert_eq!("essay".parse::<QuizType>().unwrap(), QuizType::Other);
        let parsed: QuizType = serde_json::from_str("\"essay\"").unwrap();
        assert_eq!(parsed, QuizType::Other);
        assert_eq!(serde_json::to_string(&QuizType::ToeflComplete).unwrap(), "\"toefl-complete\"");
    }
}
