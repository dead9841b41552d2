//! Error types for focusblock-core operations.

use std::path::PathBuf;

/// All errors that can occur in focusblock-core operations.
#[derive(Debug, thiserror::Error)]
pub enum BlockerError {
    // ─────────────────────────────────────────────────────────────────────
    // Conflict Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("A host block is already installed in {0}")]
    AlreadyBlocking(PathBuf),

    #[error("A session is already active (marker file present at {0})")]
    SessionActive(PathBuf),

    // ─────────────────────────────────────────────────────────────────────
    // Integrity Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Session marker at {path} could not be parsed: {details}")]
    MarkerUnreadable { path: PathBuf, details: String },

    #[error("Host block header found in {0} but no matching footer; file left untouched")]
    UnterminatedBlock(PathBuf),

    // ─────────────────────────────────────────────────────────────────────
    // Validation Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("'{0}' is not a valid divider (choose one of the listed glyphs)")]
    InvalidDivider(String),

    #[error("Duration '{0}' did not match 'H hours, M minutes' or 'M minutes'")]
    InvalidDuration(String),

    // ─────────────────────────────────────────────────────────────────────
    // Collection Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("No recap notes found for sessions {first} to {last}")]
    NoNotesFound { first: u32, last: u32 },

    // ─────────────────────────────────────────────────────────────────────
    // User Cancellation
    // ─────────────────────────────────────────────────────────────────────
    #[error("Recap capture interrupted by the user")]
    RecapCancelled,

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BlockerError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BlockerError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        BlockerError::Json {
            context: context.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using BlockerError.
pub type Result<T> = std::result::Result<T, BlockerError>;
