//! The `start` command: install the block, wait out the session, clean up.

use chrono::{Duration, Local};
use focusblock_core::{
    hosts, session, BlockOutcome, BlockerError, Divider, ResolverNotify, SessionEnd,
    SessionRecord, SessionRuntime, StorageConfig, SystemResolver, Tracker,
};

use crate::signal;
use crate::stdin_prompt::StdinPrompt;

pub struct StartArgs {
    pub sites: Option<String>,
    pub all_sites: bool,
    pub minutes: Option<u64>,
    pub continuous: bool,
    pub divider: Option<String>,
}

pub fn run(args: StartArgs) -> i32 {
    let storage = StorageConfig::default();
    match start_session(&storage, args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            match err {
                BlockerError::InvalidDivider(_) => 2,
                _ => 1,
            }
        }
    }
}

fn start_session(storage: &StorageConfig, args: StartArgs) -> Result<i32, BlockerError> {
    // All validation happens before any file mutation.
    let sites = match (&args.sites, args.all_sites) {
        (Some(list), false) => parse_site_list(list),
        (None, true) => load_default_sites(storage)?,
        (None, false) => {
            eprintln!("Error: pass --sites a,b,c or opt in to the default list with --all-sites");
            return Ok(2);
        }
        (Some(_), true) => unreachable!("clap rejects --sites with --all-sites"),
    };
    let block_minutes = match (args.minutes, args.continuous) {
        (Some(minutes), false) if minutes > 0 => Some(minutes),
        (None, true) => None,
        _ => {
            eprintln!("Error: pass --minutes N (positive) or --continuous");
            return Ok(2);
        }
    };
    let divider = args
        .divider
        .as_deref()
        .map(Divider::parse)
        .transpose()?;

    storage
        .ensure_dirs()
        .map_err(|err| BlockerError::io("creating data directories", err))?;

    // The ledger sentinel answers "can I install"; the marker answers
    // "is a session live". Refuse on either, and call out divergence.
    let blocked = hosts::is_blocked(storage.hosts_file())?;
    let active = session::is_active(storage);
    if blocked != active && (blocked || active) {
        eprintln!(
            "Warning: host block {} but session marker {}; a previous session may have ended uncleanly.",
            if blocked { "is installed" } else { "is absent" },
            if active { "exists" } else { "is missing" },
        );
    }
    if blocked {
        eprintln!("Error: a host block is already installed. End that session first.");
        return Ok(1);
    }
    if active {
        eprintln!("Remove the marker file if the previous session crashed.");
        return Err(BlockerError::SessionActive(
            storage.marker_file().to_path_buf(),
        ));
    }

    let mut tracker = Tracker::load(storage)?;
    let interrupts = signal::install();
    let mut prompt = StdinPrompt::new(interrupts.clone());
    let resolver = SystemResolver;

    let outcome = hosts::install(storage.hosts_file(), &sites)?;
    match &outcome {
        BlockOutcome::Installed(list) => {
            resolver.flush();
            println!("Blocking {} for {}.", list.join(", "), describe(block_minutes));
        }
        BlockOutcome::NothingToBlock => {
            println!("No sites entered to block.");
        }
    }

    let start_time = Local::now();
    let deadline = block_minutes.map(|m| start_time + Duration::minutes(m as i64));
    tracing::debug!(sites = sites.len(), minutes = ?block_minutes, "Session starting");
    let record = SessionRecord {
        session_number: tracker.session_number(),
        start_time,
        end_time: deadline,
        sites: sites.clone(),
    };
    session::begin(storage, &record)?;

    let mut runtime = SessionRuntime::new(
        storage,
        &mut tracker,
        interrupts,
        &mut prompt,
        &resolver,
        divider,
    );
    let trigger = runtime.wait(deadline)?;
    let end = runtime.finish(trigger)?;

    match end {
        SessionEnd::Completed { removed, note } => {
            report_unblocked(&removed);
            println!("Recap saved to {}.", note.display());
            Ok(0)
        }
        SessionEnd::RecapSkipped { removed } => {
            report_unblocked(&removed);
            println!("Recap skipped.");
            Ok(0)
        }
        SessionEnd::Forced { removed } => {
            report_unblocked(&removed);
            eprintln!("Session force-ended; recap skipped.");
            Ok(1)
        }
    }
}

fn parse_site_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|site| site.trim().to_string())
        .filter(|site| !site.is_empty())
        .collect()
}

fn load_default_sites(storage: &StorageConfig) -> Result<Vec<String>, BlockerError> {
    let path = storage.default_sites_file();
    let content = fs_err::read_to_string(&path)
        .map_err(|err| BlockerError::io(format!("reading {}", path.display()), err))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn describe(minutes: Option<u64>) -> String {
    match minutes {
        Some(minutes) => format!("{} minutes", minutes),
        None => "as long as it takes (continuous mode)".to_string(),
    }
}

fn report_unblocked(removed: &[String]) {
    if removed.is_empty() {
        println!("No sites were blocked.");
    } else {
        println!("Unblocked: {}.", removed.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_start_refuses_while_marker_exists() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        storage.ensure_dirs().unwrap();
        std::fs::write(storage.hosts_file(), "127.0.0.1 localhost\n").unwrap();
        session::begin(
            &storage,
            &SessionRecord {
                session_number: 1,
                start_time: Local::now(),
                end_time: None,
                sites: vec!["x".to_string()],
            },
        )
        .unwrap();

        let err = start_session(
            &storage,
            StartArgs {
                sites: Some("reddit".to_string()),
                all_sites: false,
                minutes: Some(10),
                continuous: false,
                divider: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, BlockerError::SessionActive(_)));
        // Refusal happens before any block is installed.
        assert!(!hosts::is_blocked(storage.hosts_file()).unwrap());
    }

    #[test]
    fn test_parse_site_list_trims_and_drops_empties() {
        assert_eq!(
            parse_site_list(" x , reddit ,,"),
            vec!["x".to_string(), "reddit".to_string()]
        );
    }

    #[test]
    fn test_describe_durations() {
        assert_eq!(describe(Some(50)), "50 minutes");
        assert!(describe(None).contains("continuous"));
    }
}
