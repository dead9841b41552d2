//! Storage configuration and path management for FocusBlock.
//!
//! A single `StorageConfig` owns every path the tool touches: the shared
//! hosts file, the ephemeral session marker, the durable tracker record, and
//! the note directories. Centralizing the paths keeps production defaults in
//! one place and lets tests inject a temp directory instead of scribbling on
//! `/etc/hosts`.

use std::path::{Path, PathBuf};

/// Central configuration for all FocusBlock storage paths.
///
/// Production code uses `StorageConfig::default()`; tests use
/// `StorageConfig::with_root(temp_dir)` for isolation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// The shared host-resolution file the block is written into.
    hosts_file: PathBuf,
    /// The ephemeral session marker (present while a session is live).
    marker_file: PathBuf,
    /// Root directory for durable data (tracker, notes, collected notes).
    data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .map(|home| home.join(".focusblock"))
            .unwrap_or_else(|| PathBuf::from(".focusblock"));
        Self {
            hosts_file: PathBuf::from("/etc/hosts"),
            marker_file: std::env::temp_dir().join("focusblock_session_info"),
            data_dir,
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig rooted at a custom directory.
    /// Used for testing with temp directories.
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            hosts_file: root.join("hosts"),
            marker_file: root.join("session_info"),
            data_dir: root,
        }
    }

    /// Path to the shared hosts file the block ledger edits.
    pub fn hosts_file(&self) -> &Path {
        &self.hosts_file
    }

    /// Path to the ephemeral session marker file.
    pub fn marker_file(&self) -> &Path {
        &self.marker_file
    }

    /// Path to the durable session tracker record.
    pub fn tracker_file(&self) -> PathBuf {
        self.data_dir.join("session_tracker.json")
    }

    /// Path to the per-session recap notes directory.
    pub fn notes_dir(&self) -> PathBuf {
        self.data_dir.join("session_notes")
    }

    /// Path to one session's recap note. `session_07.md` for session 7.
    pub fn note_file(&self, session_number: u32) -> PathBuf {
        self.notes_dir()
            .join(format!("session_{:02}.md", session_number))
    }

    /// Path to the merged day-note directory.
    pub fn collected_dir(&self) -> PathBuf {
        self.data_dir.join("collected_sessions")
    }

    /// Path to one merged day note covering an inclusive session range.
    pub fn collected_file(&self, day_number: u32, first: u32, last: u32) -> PathBuf {
        self.collected_dir().join(format!(
            "day_{:02}_sessions_{:02}_to_{:02}.md",
            day_number, first, last
        ))
    }

    /// Path to the plain-text default site list.
    pub fn default_sites_file(&self) -> PathBuf {
        self.data_dir.join("default_sites.txt")
    }

    /// Ensures the data directories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs_err::create_dir_all(&self.data_dir)?;
        fs_err::create_dir_all(self.notes_dir())?;
        fs_err::create_dir_all(self.collected_dir())?;
        Ok(())
    }
}
