//! Durable session/day counters and the stored default divider.
//!
//! One `Tracker` is constructed per process invocation and passed to
//! collaborators, so persistence timing is explicit: counters advance only
//! through the `advance_*` methods, each of which saves immediately as one
//! read-modify-write step.
//!
//! On-disk format is a small JSON document:
//!
//! ```json
//! { "session_number": 4, "day_number": 1, "default_divider": "-" }
//! ```

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::divider::Divider;
use crate::error::{BlockerError, Result};
use crate::storage::StorageConfig;

#[derive(Debug, Serialize, Deserialize)]
struct TrackerFile {
    /// Next session number to assign. Starts at 1, never resets.
    session_number: u32,
    /// Number of day notes collected so far. Starts at 0, never resets.
    #[serde(default)]
    day_number: u32,
    /// Divider glyph chosen on first use, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_divider: Option<String>,
}

impl Default for TrackerFile {
    fn default() -> Self {
        TrackerFile {
            session_number: 1,
            day_number: 0,
            default_divider: None,
        }
    }
}

/// File-backed tracker state.
pub struct Tracker {
    state: TrackerFile,
    path: PathBuf,
}

impl Tracker {
    /// Loads the tracker, starting fresh if the file does not exist yet.
    pub fn load(storage: &StorageConfig) -> Result<Self> {
        let path = storage.tracker_file();
        let state = match fs::read(&path) {
            Ok(data) => serde_json::from_slice(&data)
                .map_err(|err| BlockerError::json("parsing session tracker", err))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => TrackerFile::default(),
            Err(err) => return Err(BlockerError::io("reading session tracker", err)),
        };
        Ok(Tracker { state, path })
    }

    /// Next session number to assign.
    pub fn session_number(&self) -> u32 {
        self.state.session_number
    }

    /// Number of day notes collected so far.
    pub fn day_number(&self) -> u32 {
        self.state.day_number
    }

    /// The stored default divider, if one has been chosen.
    pub fn default_divider(&self) -> Option<Divider> {
        self.state
            .default_divider
            .as_deref()
            .and_then(|glyph| Divider::parse(glyph).ok())
    }

    /// Records a session completion, persisting immediately.
    pub fn advance_session(&mut self) -> Result<()> {
        self.state.session_number += 1;
        self.save()
    }

    /// Records a collection completion, persisting immediately.
    pub fn advance_day(&mut self) -> Result<()> {
        self.state.day_number += 1;
        self.save()
    }

    /// Stores the divider to use when none is given explicitly.
    pub fn set_default_divider(&mut self, divider: Divider) -> Result<()> {
        self.state.default_divider = Some(divider.as_str().to_string());
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| BlockerError::io("creating tracker directory", err))?;
        }
        let payload = serde_json::to_vec_pretty(&self.state)
            .map_err(|err| BlockerError::json("serializing session tracker", err))?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload)
            .map_err(|err| BlockerError::io("writing session tracker", err))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|err| BlockerError::io("committing session tracker", err))?;
        Ok(())
    }
}
