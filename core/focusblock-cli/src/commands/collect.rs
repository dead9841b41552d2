//! The `collect` command: merge a range of recap notes into one day note.

use focusblock_core::{recap, BlockerError, Divider, StorageConfig, Tracker};

use crate::signal;
use crate::stdin_prompt::StdinPrompt;

pub fn run(from: u32, to: u32, divider: Option<String>) -> i32 {
    if from == 0 || to < from {
        eprintln!("Error: --from must be at least 1 and --to must not be below --from");
        return 2;
    }

    let storage = StorageConfig::default();
    match collect(&storage, from, to, divider) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {}", err);
            match err {
                BlockerError::InvalidDivider(_) => 2,
                _ => 1,
            }
        }
    }
}

fn collect(
    storage: &StorageConfig,
    from: u32,
    to: u32,
    divider: Option<String>,
) -> Result<(), BlockerError> {
    let explicit = divider.as_deref().map(Divider::parse).transpose()?;
    let mut tracker = Tracker::load(storage)?;

    let interrupts = signal::install();
    let mut prompt = StdinPrompt::new(interrupts);
    let divider = recap::resolve_divider(explicit, &mut tracker, &mut prompt)?;

    tracing::debug!(from, to, divider = %divider, "Merging recap notes");
    let collected = recap::merge(storage, &mut tracker, from, to, divider)?;
    println!(
        "Collected sessions {:?} into day {} ({}).",
        collected.sessions_merged, collected.day_number, collected.total_duration
    );
    println!("Day note saved to {}.", collected.path.display());
    Ok(())
}
