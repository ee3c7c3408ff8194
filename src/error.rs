//! Error taxonomy shared by both setup utilities.
//!
//! Every failure is fatal. Functions return `anyhow::Result` and wrap a
//! [`SetupError`] so the binaries can print it and callers can classify it
//! with `downcast_ref`.

use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum SetupError {
    /// Missing or invalid environment input, or an unsupported platform
    Configuration(String),
    /// Download failed (transport error or non-success HTTP status)
    Network { url: String, reason: String },
    /// Missing source file, unpack failure or copy failure
    FileSystem { path: PathBuf, reason: String },
}

impl SetupError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        SetupError::Configuration(msg.into())
    }

    pub fn network(url: &str, reason: impl Display) -> Self {
        SetupError::Network {
            url: url.to_string(),
            reason: format!("{:#}", reason),
        }
    }

    pub fn file_system(path: &Path, reason: impl Display) -> Self {
        SetupError::FileSystem {
            path: path.to_path_buf(),
            reason: format!("{:#}", reason),
        }
    }
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            SetupError::Network { url, reason } => {
                write!(f, "Failed to download {}: {}", url, reason)
            }
            SetupError::FileSystem { path, reason } => {
                write!(f, "File system error at {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for SetupError {}
