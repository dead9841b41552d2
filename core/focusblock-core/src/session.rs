//! The ephemeral session marker: durable evidence that a session is live.
//!
//! Written at session start, read back exactly once at termination to recover
//! the original start time (the only field cleanup relies on after a process
//! restart), then deleted. The format is line-oriented key/value text so a
//! human can inspect it after a crash:
//!
//! ```text
//! Session number 4
//! Start time:08/24/26, 09:15:00
//! End time:08/24/26, 10:00:00
//! reddit
//! x
//! ```
//!
//! `End time` is present only in fixed-duration mode. The marker file, not
//! the hosts-file sentinel, is the canonical "session active" signal.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use fs_err as fs;
use std::path::Path;

use crate::error::{BlockerError, Result};
use crate::storage::StorageConfig;

/// Timestamp format used in the marker file.
pub const TIME_FORMAT: &str = "%m/%d/%y, %H:%M:%S";

const SESSION_NUMBER_LABEL: &str = "Session number ";
const START_TIME_LABEL: &str = "Start time:";
const END_TIME_LABEL: &str = "End time:";

/// One live session, serialized to the marker file at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_number: u32,
    pub start_time: DateTime<Local>,
    /// Absent in continuous mode.
    pub end_time: Option<DateTime<Local>>,
    /// Ordered list of blocked site names; empty means nothing was blocked.
    pub sites: Vec<String>,
}

/// Returns whether a session marker is present.
pub fn is_active(storage: &StorageConfig) -> bool {
    storage.marker_file().exists()
}

/// Serializes a session record to the marker file.
pub fn begin(storage: &StorageConfig, record: &SessionRecord) -> Result<()> {
    let mut content = String::new();
    content.push_str(&format!(
        "{}{}\n",
        SESSION_NUMBER_LABEL, record.session_number
    ));
    content.push_str(&format!(
        "{}{}\n",
        START_TIME_LABEL,
        record.start_time.format(TIME_FORMAT)
    ));
    if let Some(end_time) = record.end_time {
        content.push_str(&format!(
            "{}{}\n",
            END_TIME_LABEL,
            end_time.format(TIME_FORMAT)
        ));
    }
    for site in &record.sites {
        content.push_str(site);
        content.push('\n');
    }

    fs::write(storage.marker_file(), content)
        .map_err(|err| BlockerError::io("writing session marker", err))?;
    tracing::info!(
        session = record.session_number,
        path = %storage.marker_file().display(),
        "Session marker written"
    );
    Ok(())
}

/// Reads the start time back from the marker, then deletes the marker.
///
/// `Ok(None)` when no marker exists. A marker that exists but cannot be
/// parsed is still deleted (it is spent either way) and reported as a
/// data-integrity error.
pub fn recover_and_clear(storage: &StorageConfig) -> Result<Option<DateTime<Local>>> {
    let path = storage.marker_file();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(BlockerError::io("reading session marker", err)),
    };

    let parsed = parse_start_time(&content);
    remove_marker(path)?;

    match parsed {
        Some(start_time) => Ok(Some(start_time)),
        None => Err(BlockerError::MarkerUnreadable {
            path: path.to_path_buf(),
            details: "no parsable 'Start time:' line".to_string(),
        }),
    }
}

/// Deletes the marker without reading it. Used on the forced-exit path.
pub fn clear(storage: &StorageConfig) -> Result<()> {
    let path = storage.marker_file();
    if path.exists() {
        remove_marker(path)?;
    }
    Ok(())
}

/// Best-effort read of the blocked site list, for status reporting.
/// A missing or malformed marker yields an empty list.
pub fn peek_sites(storage: &StorageConfig) -> Vec<String> {
    let content = match fs::read_to_string(storage.marker_file()) {
        Ok(content) => content,
        Err(_) => return Vec::new(),
    };
    content
        .lines()
        .filter(|line| {
            !line.starts_with(SESSION_NUMBER_LABEL)
                && !line.starts_with(START_TIME_LABEL)
                && !line.starts_with(END_TIME_LABEL)
                && !line.trim().is_empty()
        })
        .map(|line| line.trim().to_string())
        .collect()
}

fn remove_marker(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|err| BlockerError::io("removing session marker", err))?;
    tracing::info!(path = %path.display(), "Session marker cleared");
    Ok(())
}

fn parse_start_time(content: &str) -> Option<DateTime<Local>> {
    let raw = content
        .lines()
        .find_map(|line| line.strip_prefix(START_TIME_LABEL))?;
    let naive = NaiveDateTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}
