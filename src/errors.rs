use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a whole scan. Nothing below the scan root ends up here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Scan root does not exist: {}", root.display())]
    RootNotFound { root: PathBuf },

    #[error("Scan root is not a directory: {}", root.display())]
    NotADirectory { root: PathBuf },

    #[error("Scan root is not readable: {}: {source}", root.display())]
    RootUnreadable { root: PathBuf, source: std::io::Error },

    #[error("Scan cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a single entry was left out of the graph.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("stat failed: {0}")]
    Metadata(std::io::Error),

    #[error("read failed: {0}")]
    Read(std::io::Error),

    #[error("walk error: {0}")]
    Walk(String),
}

/// An entry the scan passed over, with the reason. Reported alongside the graph, never as `Err`.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}
