use anyhow::Context;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::default_data_dir;
use crate::learning::scoring::QuizType;
use crate::queue::BREAK_THRESHOLD;

pub const CONFIG_FILE: &str = "vocaloop.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Words per session, 0 for no limit.
    pub session_size: usize,
    pub quiz_type: QuizType,
    /// Consecutive misses before the session suggests a break.
    pub break_threshold: u32,
    /// Overrides where the library and session records live. The config file
    /// itself is always read from the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        StudyConfig {
            session_size: 20,
            quiz_type: QuizType::Multiple,
            break_threshold: BREAK_THRESHOLD,
            data_dir: None,
        }
    }
}

impl StudyConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn library_path(&self) -> PathBuf {
        self.data_dir().join("library.json")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir().join("sessions")
    }
}

fn read_config(path: &Path) -> anyhow::Result<StudyConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config = toml::from_str::<StudyConfig>(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Load config from `path`, falling back to defaults when it is missing or invalid.
pub fn load_config_from(path: &Path) -> StudyConfig {
    if !path.exists() {
        tracing::info!(path = ?path, "No config file, using default study configuration");
        return StudyConfig::default();
    }

    match read_config(path) {
        Ok(config) => {
            tracing::info!(path = ?path, "Loaded study configuration");
            config
        }
        Err(e) => {
            tracing::warn!(path = ?path, error = %format!("{:#}", e), "Failed to load config, using defaults");
            StudyConfig::default()
        }
    }
}

lazy_static! {
    static ref STUDY_CONFIG: StudyConfig = load_config_from(&default_data_dir().join(CONFIG_FILE));
}

/// Get the cached study configuration (loaded once per process) from
/// `<platform data dir>/vocaloop.toml`. Its `data_dir` only redirects
/// [`StudyConfig::library_path`] and [`StudyConfig::sessions_dir`]; use
/// [`load_config_from`] to read a config stored elsewhere.
pub fn get_config() -> &'static StudyConfig {
    &STUDY_CONFIG
}
