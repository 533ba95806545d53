//! Error types and the status line they end up in

use std::io;
use std::path::PathBuf;

/// Fatal startup failures
#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("Failed to create rendering surface: {0}")]
    Surface(String),
    #[error("Failed to build {stage} stage: {log}")]
    Shader { stage: &'static str, log: String },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// A model could not be loaded. The previous model stays in place.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Malformed geometry in '{shape}': {message}")]
    MalformedGeometry { shape: String, message: String },
    #[error("Model has no geometry")]
    Empty,
}

/// Export aborted, nothing (or a partial file) was written
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One line of user-facing feedback for the panel status area
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), severity: Severity::Info }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { text: text.into(), severity: Severity::Warning }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), severity: Severity::Error }
    }
}
