use serde::{Serialize, Deserialize};
use std::fmt;
use crate::queue::QueueError;

/// Error returned by every fallible VocaLoop operation.
///
/// `stage` names where it happened (`queue`, `store`, `io`, `json_parse`,
/// `config`, ...) so callers can branch on it without matching message text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocaError {
    pub message: String,
    pub stage: String,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl VocaError {
    /// Build an error for `stage`
    pub fn new<S: Into<String>>(message: S, stage: &'static str) -> Self {
        VocaError {
            message: message.into(),
            stage: stage.to_string(),
            context: None,
            source: None,
        }
    }

    /// Attach detail such as the path or word id involved
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Record which library the failure came from
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for VocaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if let Some(ref context) = self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (source: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for VocaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<QueueError> for VocaError {
    fn from(err: QueueError) -> Self {
        VocaError::new(err.to_string(), "queue").with_source("queue")
    }
}

impl From<anyhow::Error> for VocaError {
    fn from(err: anyhow::Error) -> Self {
        VocaError::new(
            format!("{:#}", err),
            "unknown"
        ).with_source("anyhow")
    }
}

impl From<std::io::Error> for VocaError {
    fn from(err: std::io::Error) -> Self {
        VocaError::new(
            format!("I/O error: {}", err),
            "io"
        ).with_source("std::io")
    }
}

impl From<serde_json::Error> for VocaError {
    fn from(err: serde_json::Error) -> Self {
        VocaError::new(
            format!("JSON error: {}", err),
            "json_parse"
        ).with_source("serde_json")
    }
}

impl From<toml::de::Error> for VocaError {
    fn from(err: toml::de::Error) -> Self {
        VocaError::new(
            format!("Config error: {}", err),
            "config"
        ).with_source("toml")
    }
}
