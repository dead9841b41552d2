//! The `status` command: report session and host-block state.

use focusblock_core::{hosts, session, BlockerError, StorageConfig, Tracker};

pub fn run() -> i32 {
    let storage = StorageConfig::default();
    match report(&storage) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {}", err);
            1
        }
    }
}

fn report(storage: &StorageConfig) -> Result<(), BlockerError> {
    let blocked = hosts::is_blocked(storage.hosts_file())?;
    let active = session::is_active(storage);

    match (active, blocked) {
        (true, true) => {
            let sites = session::peek_sites(storage);
            println!("Session active.");
            if sites.is_empty() {
                println!("No sites blocked.");
            } else {
                println!("Blocked sites: {}.", sites.join(", "));
            }
        }
        (false, false) => {
            println!("No session active.");
        }
        (true, false) => {
            println!("Session marker exists but no host block is installed.");
            println!(
                "Warning: the sources disagree; a previous session may have ended uncleanly. \
                 Marker: {}",
                storage.marker_file().display()
            );
        }
        (false, true) => {
            println!("A host block is installed but no session marker exists.");
            println!(
                "Warning: the sources disagree; run a session end or remove the block from {}.",
                storage.hosts_file().display()
            );
        }
    }

    if let Ok(tracker) = Tracker::load(storage) {
        println!(
            "Next session: {}. Days collected: {}.",
            tracker.session_number(),
            tracker.day_number()
        );
    }
    Ok(())
}
