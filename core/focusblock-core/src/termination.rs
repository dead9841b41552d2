//! Session termination: the phase machine and the runtime that drives it.
//!
//! A running session ends one of three ways: the timer elapses, the user
//! confirms an early end after one interrupt, or a second interrupt forces a
//! hard exit. The transition rules live in [`next_phase`] as a pure function;
//! [`SessionRuntime`] supplies the waiting, prompting, and cleanup around it.
//!
//! The forced path exists for a hung confirmation prompt: it removes the host
//! block and the marker without asking anything further, skips the recap, and
//! reports a non-zero exit.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Local};

use crate::divider::Divider;
use crate::error::{BlockerError, Result};
use crate::hosts;
use crate::interrupt::{InterruptSource, InterruptWatcher};
use crate::prompt::{Answer, Prompt};
use crate::recap;
use crate::resolver::ResolverNotify;
use crate::session;
use crate::storage::StorageConfig;
use crate::tracker::Tracker;

/// Where the termination flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    ConfirmPending,
    Ending { forced: bool },
    Ended,
}

/// Something that can move the termination flow forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    TimerElapsed,
    Interrupt,
    Confirmed,
    Declined,
}

/// Pure transition function for the termination flow.
pub fn next_phase(current: Phase, event: PhaseEvent) -> Phase {
    match (current, event) {
        (Phase::Running, PhaseEvent::TimerElapsed) => Phase::Ending { forced: false },
        (Phase::Running, PhaseEvent::Interrupt) => Phase::ConfirmPending,
        (Phase::ConfirmPending, PhaseEvent::Interrupt) => Phase::Ending { forced: true },
        (Phase::ConfirmPending, PhaseEvent::Confirmed) => Phase::Ending { forced: false },
        (Phase::ConfirmPending, PhaseEvent::Declined) => Phase::Running,
        (Phase::Ending { .. }, _) | (Phase::Ended, _) => Phase::Ended,
        (phase, _) => phase,
    }
}

/// Why the wait loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndTrigger {
    /// The timer ran out.
    Natural,
    /// The user confirmed an early end.
    Confirmed,
    /// A second interrupt arrived; hard cleanup, no recap.
    Forced,
}

/// How the session ended, for exit-code mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Block removed, recap captured.
    Completed {
        removed: Vec<String>,
        note: std::path::PathBuf,
    },
    /// Block removed; the user cancelled the recap dialogue.
    RecapSkipped { removed: Vec<String> },
    /// Forced hard exit: block and marker removed, recap skipped.
    Forced { removed: Vec<String> },
}

/// Drives one session from waiting through cleanup.
pub struct SessionRuntime<'a> {
    storage: &'a StorageConfig,
    tracker: &'a mut Tracker,
    interrupts: InterruptWatcher,
    prompt: &'a mut dyn Prompt,
    resolver: &'a dyn ResolverNotify,
    divider: Option<Divider>,
    poll_interval: StdDuration,
}

impl<'a> SessionRuntime<'a> {
    pub fn new(
        storage: &'a StorageConfig,
        tracker: &'a mut Tracker,
        interrupts: Arc<dyn InterruptSource>,
        prompt: &'a mut dyn Prompt,
        resolver: &'a dyn ResolverNotify,
        divider: Option<Divider>,
    ) -> Self {
        SessionRuntime {
            storage,
            tracker,
            interrupts: InterruptWatcher::new(interrupts),
            prompt,
            resolver,
            divider,
            poll_interval: StdDuration::from_millis(250),
        }
    }

    /// Shortens the poll interval, for tests that drive the loop quickly.
    pub fn with_poll_interval(mut self, interval: StdDuration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Blocks until the session should end.
    ///
    /// `deadline` of `None` waits indefinitely (continuous mode). Signal
    /// delivery preempts the wait at poll granularity.
    pub fn wait(&mut self, deadline: Option<DateTime<Local>>) -> Result<EndTrigger> {
        let mut phase = Phase::Running;
        loop {
            let pending = self.interrupts.take_pending();
            if pending > 0 {
                phase = next_phase(phase, PhaseEvent::Interrupt);
                if pending > 1 {
                    // Both signals landed in one poll window.
                    phase = next_phase(phase, PhaseEvent::Interrupt);
                }
            }

            match phase {
                Phase::Ending { forced: true } => return Ok(EndTrigger::Forced),
                Phase::Ending { forced: false } => return Ok(EndTrigger::Confirmed),
                Phase::ConfirmPending => {
                    let event = self.confirm_end()?;
                    phase = next_phase(phase, event);
                    continue;
                }
                Phase::Running => {}
                Phase::Ended => unreachable!("wait loop never reaches Ended"),
            }

            if let Some(deadline) = deadline {
                if Local::now() >= deadline {
                    return Ok(EndTrigger::Natural);
                }
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    /// The yes/no early-end confirmation. Re-prompts on anything that is not
    /// a clear answer; an interrupt during the prompt forces the hard path;
    /// EOF ends the session (with stdin gone there is nobody left to ask).
    fn confirm_end(&mut self) -> Result<PhaseEvent> {
        loop {
            if self.interrupts.take_pending() > 0 {
                return Ok(PhaseEvent::Interrupt);
            }
            match self.prompt.read_line("\nEnd session early? [y/n] ")? {
                Answer::Line(line) => match line.trim().to_lowercase().as_str() {
                    "y" | "yes" => return Ok(PhaseEvent::Confirmed),
                    "n" | "no" => return Ok(PhaseEvent::Declined),
                    _ => continue,
                },
                Answer::Cancelled => return Ok(PhaseEvent::Interrupt),
                Answer::Eof => return Ok(PhaseEvent::Confirmed),
            }
        }
    }

    /// Tears the session down: removes the block, recovers the start time
    /// from the marker, and (unless forced or cancelled) captures the recap.
    pub fn finish(&mut self, trigger: EndTrigger) -> Result<SessionEnd> {
        let removed: Vec<String> = hosts::uninstall(self.storage.hosts_file())?
            .into_iter()
            .collect();
        self.resolver.flush();

        if trigger == EndTrigger::Forced {
            session::clear(self.storage)?;
            tracing::warn!("Forced exit: block and marker removed, recap skipped");
            return Ok(SessionEnd::Forced { removed });
        }

        let start_time = match session::recover_and_clear(self.storage)? {
            Some(start_time) => start_time,
            None => {
                return Err(BlockerError::MarkerUnreadable {
                    path: self.storage.marker_file().to_path_buf(),
                    details: "marker file missing at session end".to_string(),
                })
            }
        };

        match recap::capture(
            self.storage,
            self.tracker,
            self.prompt,
            start_time,
            Local::now(),
            self.divider,
        ) {
            Ok(note) => Ok(SessionEnd::Completed { removed, note }),
            Err(BlockerError::RecapCancelled) => {
                tracing::info!("Recap capture cancelled by the user");
                Ok(SessionEnd::RecapSkipped { removed })
            }
            Err(err) => Err(err),
        }
    }
}
