//! The block ledger: a sentinel-delimited region of null-route records
//! inside the shared hosts file.
//!
//! # File Format
//!
//! ```text
//! 127.0.0.1 localhost          <- untouched
//! # Added by work script       <- header sentinel
//! 0.0.0.0 reddit.com
//! 0.0.0.0 www.reddit.com
//!
//! End of section               <- footer sentinel
//! # anything after             <- untouched
//! ```
//!
//! Everything outside the sentinel pair is never modified. At most one block
//! may exist at a time; a pre-existing header is a conflict, not something to
//! merge into.
//!
//! # Atomic Rewrites
//!
//! Removal rewrites through a temp file in the hosts file's own directory and
//! renames it into place, so a crash mid-write never truncates the file.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use fs_err as fs;
use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::NamedTempFile;

use crate::error::{BlockerError, Result};

/// Header sentinel marking the start of the managed region.
pub const HEADER_SENTINEL: &str = "# Added by work script";
/// Footer sentinel marking the end of the managed region.
pub const FOOTER_SENTINEL: &str = "End of section";

const NULL_ROUTE: &str = "0.0.0.0";

/// Matches a record line's domain and captures the apex site name.
/// Tolerant of foreign lines: anything that doesn't match is skipped.
static SITE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:www\.)?([a-zA-Z0-9-]+)\.com").expect("valid site regex"));

/// Result of an install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    /// The block was appended; holds the effective site list for display.
    Installed(Vec<String>),
    /// No sites were supplied; nothing was written.
    NothingToBlock,
}

/// Returns whether the managed block is currently present.
///
/// This is a file-format detail, not session state: the session marker is the
/// canonical "session active" signal, and callers compare the two to surface
/// divergence.
pub fn is_blocked(hosts_path: &Path) -> Result<bool> {
    let content = read_hosts(hosts_path)?;
    Ok(content.lines().any(|line| line.trim() == HEADER_SENTINEL))
}

/// Appends a sentinel-delimited block of null-route records for `sites`.
///
/// Fails with `AlreadyBlocking` (and writes nothing) if a block is already
/// present, even for an empty site list. An empty site list on an unblocked
/// file is a no-op success.
pub fn install(hosts_path: &Path, sites: &[String]) -> Result<BlockOutcome> {
    let existing = read_hosts(hosts_path)?;
    if existing.lines().any(|line| line.trim() == HEADER_SENTINEL) {
        return Err(BlockerError::AlreadyBlocking(hosts_path.to_path_buf()));
    }
    if sites.is_empty() {
        return Ok(BlockOutcome::NothingToBlock);
    }

    let mut lines = vec![HEADER_SENTINEL.to_string()];
    for site in sites {
        lines.push(format!("{} {}.com", NULL_ROUTE, site));
        lines.push(format!("{} www.{}.com", NULL_ROUTE, site));
    }
    lines.push(String::new());
    lines.push(FOOTER_SENTINEL.to_string());

    // The appended block preserves whether the file ends with a newline, so
    // removal can give back the original bytes exactly. A file that ended
    // without one gets a separator newline before the header and no newline
    // after the footer.
    let block = if existing.is_empty() || existing.ends_with('\n') {
        format!("{}\n", lines.join("\n"))
    } else {
        format!("\n{}", lines.join("\n"))
    };

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(hosts_path)
        .map_err(|err| BlockerError::io("opening hosts file for append", err))?;
    file.write_all(block.as_bytes())
        .map_err(|err| BlockerError::io("appending host block", err))?;

    tracing::info!(sites = sites.len(), path = %hosts_path.display(), "Host block installed");
    Ok(BlockOutcome::Installed(sites.to_vec()))
}

/// Removes the sentinel-delimited block, returning the set of site names
/// that were blocked.
///
/// Idempotent: no header means an empty set and no rewrite. A header with no
/// matching footer is an integrity error and the file is left untouched.
pub fn uninstall(hosts_path: &Path) -> Result<BTreeSet<String>> {
    let content = read_hosts(hosts_path)?;

    let Some(region) = find_block(&content) else {
        return Ok(BTreeSet::new());
    };
    let Some(end) = region.end else {
        return Err(BlockerError::UnterminatedBlock(hosts_path.to_path_buf()));
    };

    // Splice the region out of the raw bytes; surrounding content keeps its
    // exact line endings. A block at end of file with no final newline means
    // the file had none before install glued the block on, so the separator
    // newline comes back off the preceding line.
    let prefix = &content[..region.start];
    let suffix = &content[end..];
    let kept = if suffix.is_empty() && !content.ends_with('\n') {
        prefix.strip_suffix('\n').unwrap_or(prefix).to_string()
    } else {
        format!("{}{}", prefix, suffix)
    };

    write_hosts_atomic(hosts_path, &kept)?;
    tracing::info!(
        removed = region.sites.len(),
        path = %hosts_path.display(),
        "Host block removed"
    );
    Ok(region.sites)
}

struct BlockRegion {
    /// Byte offset of the header line's start.
    start: usize,
    /// Byte offset just past the footer line, or `None` without a footer.
    end: Option<usize>,
    sites: BTreeSet<String>,
}

/// Locates the sentinel-delimited region as a byte range over `content` and
/// collects the site names recorded inside it.
fn find_block(content: &str) -> Option<BlockRegion> {
    let mut offset = 0;
    let mut start = None;
    let mut sites = BTreeSet::new();
    for segment in content.split_inclusive('\n') {
        let line = segment.trim();
        match start {
            None if line == HEADER_SENTINEL => start = Some(offset),
            None => {}
            Some(begin) => {
                if line == FOOTER_SENTINEL {
                    return Some(BlockRegion {
                        start: begin,
                        end: Some(offset + segment.len()),
                        sites,
                    });
                }
                if let Some(captures) = SITE_PATTERN.captures(segment) {
                    sites.insert(captures[1].to_string());
                }
            }
        }
        offset += segment.len();
    }
    start.map(|begin| BlockRegion {
        start: begin,
        end: None,
        sites,
    })
}

fn read_hosts(hosts_path: &Path) -> Result<String> {
    match fs::read_to_string(hosts_path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(BlockerError::io("reading hosts file", err)),
    }
}

fn write_hosts_atomic(hosts_path: &Path, content: &str) -> Result<()> {
    let dir = hosts_path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|err| BlockerError::io("creating temp hosts file", err))?;
    temp.write_all(content.as_bytes())
        .map_err(|err| BlockerError::io("writing temp hosts file", err))?;
    temp.persist(hosts_path)
        .map_err(|err| BlockerError::io("replacing hosts file", err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hosts_fixture(initial: &str) -> (TempDir, std::path::PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hosts");
        std::fs::write(&path, initial).unwrap();
        (temp, path)
    }

    fn sites(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_install_appends_apex_and_www_records() {
        let (_temp, path) = hosts_fixture("127.0.0.1 localhost\n");

        let outcome = install(&path, &sites(&["reddit"])).unwrap();
        assert_eq!(outcome, BlockOutcome::Installed(sites(&["reddit"])));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("0.0.0.0 reddit.com\n"));
        assert!(content.contains("0.0.0.0 www.reddit.com\n"));
        assert!(content.contains(HEADER_SENTINEL));
        assert!(content.contains(FOOTER_SENTINEL));
        assert!(content.starts_with("127.0.0.1 localhost\n"));
    }

    #[test]
    fn test_install_empty_site_list_is_noop() {
        let (_temp, path) = hosts_fixture("127.0.0.1 localhost\n");

        let outcome = install(&path, &[]).unwrap();
        assert_eq!(outcome, BlockOutcome::NothingToBlock);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "127.0.0.1 localhost\n"
        );
    }

    #[test]
    fn test_install_empty_list_while_blocked_is_conflict() {
        let (_temp, path) = hosts_fixture("");
        install(&path, &sites(&["x"])).unwrap();

        let err = install(&path, &[]).unwrap_err();
        assert!(matches!(err, BlockerError::AlreadyBlocking(_)));
    }

    #[test]
    fn test_install_twice_is_a_conflict_and_leaves_file_alone() {
        let (_temp, path) = hosts_fixture("");
        install(&path, &sites(&["x"])).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = install(&path, &sites(&["reddit"])).unwrap_err();
        assert!(matches!(err, BlockerError::AlreadyBlocking(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_uninstall_round_trips_sites_and_restores_surroundings() {
        let before = "127.0.0.1 localhost\n# comment kept\n";
        let (_temp, path) = hosts_fixture(before);

        install(&path, &sites(&["x", "reddit"])).unwrap();
        let removed = uninstall(&path).unwrap();

        let expected: BTreeSet<String> = sites(&["reddit", "x"]).into_iter().collect();
        assert_eq!(removed, expected);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_uninstall_restores_file_without_trailing_newline() {
        let before = "127.0.0.1 localhost";
        let (_temp, path) = hosts_fixture(before);

        install(&path, &sites(&["x"])).unwrap();
        assert!(is_blocked(&path).unwrap());
        uninstall(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_uninstall_preserves_crlf_line_endings() {
        let before = "127.0.0.1 localhost\r\n# comment kept\r\n";
        let (_temp, path) = hosts_fixture(before);

        install(&path, &sites(&["reddit"])).unwrap();
        let removed = uninstall(&path).unwrap();

        assert!(removed.contains("reddit"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_uninstall_preserves_content_after_footer() {
        let (_temp, path) = hosts_fixture("top\n");
        install(&path, &sites(&["x"])).unwrap();
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("trailing entry\n");
        std::fs::write(&path, &content).unwrap();

        uninstall(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "top\ntrailing entry\n"
        );
    }

    #[test]
    fn test_uninstall_is_idempotent() {
        let (_temp, path) = hosts_fixture("127.0.0.1 localhost\n");
        install(&path, &sites(&["x"])).unwrap();

        assert!(!uninstall(&path).unwrap().is_empty());
        let second = uninstall(&path).unwrap();
        assert!(second.is_empty());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "127.0.0.1 localhost\n"
        );
    }

    #[test]
    fn test_uninstall_skips_foreign_lines_inside_block() {
        let content = format!(
            "{}\n0.0.0.0 reddit.com\ngarbage line !!\n0.0.0.0 www.reddit.com\n\n{}\n",
            HEADER_SENTINEL, FOOTER_SENTINEL
        );
        let (_temp, path) = hosts_fixture(&content);

        let removed = uninstall(&path).unwrap();
        let expected: BTreeSet<String> = sites(&["reddit"]).into_iter().collect();
        assert_eq!(removed, expected);
    }

    #[test]
    fn test_uninstall_missing_footer_is_integrity_error() {
        let content = format!("kept\n{}\n0.0.0.0 x.com\n", HEADER_SENTINEL);
        let (_temp, path) = hosts_fixture(&content);

        let err = uninstall(&path).unwrap_err();
        assert!(matches!(err, BlockerError::UnterminatedBlock(_)));
        // File untouched on integrity failure.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_uninstall_deduplicates_apex_and_www() {
        let (_temp, path) = hosts_fixture("");
        install(&path, &sites(&["x"])).unwrap();

        let removed = uninstall(&path).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(removed.contains("x"));
    }

    #[test]
    fn test_is_blocked_tracks_header_presence() {
        let (_temp, path) = hosts_fixture("127.0.0.1 localhost\n");
        assert!(!is_blocked(&path).unwrap());

        install(&path, &sites(&["x"])).unwrap();
        assert!(is_blocked(&path).unwrap());

        uninstall(&path).unwrap();
        assert!(!is_blocked(&path).unwrap());
    }

    #[test]
    fn test_is_blocked_missing_file_is_not_blocked() {
        let temp = TempDir::new().unwrap();
        assert!(!is_blocked(&temp.path().join("hosts")).unwrap());
    }
}
