use serde::{Serialize, Deserialize};
use std::fmt;

/// Lowest rate that counts as `Learning`.
pub const LEARNING_THRESHOLD: i64 = 40;
/// Lowest rate that counts as `Memorized`.
pub const MEMORIZED_THRESHOLD: i64 = 80;

/// Mastery classification derived from a learning rate. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LearningStatus {
    Difficult,
    Learning,
    Memorized,
}

impl LearningStatus {
    pub const ALL: [LearningStatus; 3] = [
        LearningStatus::Difficult,
        LearningStatus::Learning,
        LearningStatus::Memorized,
    ];

    /// Anchor color shown for this status.
    pub fn color(self) -> Rgb {
        match self {
            LearningStatus::Difficult => DANGER,
            LearningStatus::Learning => PROGRESS,
            LearningStatus::Memorized => SUCCESS,
        }
    }
}

impl From<Option<i64>> for LearningStatus {
    /// A missing rate counts as 0.
    fn from(rate: Option<i64>) -> Self {
        classify(rate.unwrap_or(0))
    }
}

impl fmt::Display for LearningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LearningStatus::Difficult => "DIFFICULT",
            LearningStatus::Learning => "LEARNING",
            LearningStatus::Memorized => "MEMORIZED",
        };
        f.write_str(label)
    }
}

/// Classify a rate. Total over all integers; each band includes its lower edge.
pub fn classify(rate: i64) -> LearningStatus {
    if rate >= MEMORIZED_THRESHOLD {
        LearningStatus::Memorized
    } else if rate >= LEARNING_THRESHOLD {
        LearningStatus::Learning
    } else {
        LearningStatus::Difficult
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

pub const DANGER: Rgb = Rgb::new(239, 68, 68);
pub const PROGRESS: Rgb = Rgb::new(59, 130, 246);
pub const SUCCESS: Rgb = Rgb::new(34, 197, 94);

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let value = from as f64 + (to as f64 - from as f64) * t;
    value.round().clamp(0.0, 255.0) as u8
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    Rgb {
        r: lerp_channel(from.r, to.r, t),
        g: lerp_channel(from.g, to.g, t),
        b: lerp_channel(from.b, to.b, t),
    }
}

/// Display color for a rate, interpolated per channel between the status anchors.
/// Breakpoints are shared with [`classify`]; NaN is treated as 0.
pub fn color_for(rate: f64) -> Rgb {
    let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 100.0) };
    let learning = LEARNING_THRESHOLD as f64;
    let memorized = MEMORIZED_THRESHOLD as f64;

    if rate < learning {
        lerp(DANGER, PROGRESS, rate / learning)
    } else if rate < memorized {
        lerp(PROGRESS, SUCCESS, (rate - learning) / (memorized - learning))
    } else {
        SUCCESS
    }
}
