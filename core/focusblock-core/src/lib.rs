//! # focusblock-core
//!
//! Core library for FocusBlock: block distracting sites in the system hosts
//! file for the length of a focus session, track session state across process
//! restarts, and collect recap notes into daily summaries.
//!
//! ## Design Principles
//!
//! - **Synchronous**: single process, single thread; the only "concurrency"
//!   is OS signal delivery preempting a blocking wait.
//! - **Injectable I/O seams**: interactive input ([`prompt::Prompt`]),
//!   signal delivery ([`interrupt::InterruptSource`]), and resolver
//!   notification ([`resolver::ResolverNotify`]) are traits, so every state
//!   transition is testable without a terminal or real signals.
//! - **Two sources of truth, reconciled**: the hosts-file sentinel answers
//!   "can I install a block"; the session marker answers "is there recap
//!   state to recover". Callers surface a warning when they disagree.
//! - **No partial writes**: the hosts rewrite goes through a temp file and
//!   rename; counter updates are single read-modify-write steps.

pub mod divider;
pub mod duration;
pub mod error;
pub mod hosts;
pub mod interrupt;
pub mod prompt;
pub mod recap;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod termination;
pub mod tracker;

pub use divider::{Divider, ALL_DIVIDERS};
pub use error::{BlockerError, Result};
pub use hosts::BlockOutcome;
pub use interrupt::{AtomicInterrupts, InterruptSource};
pub use prompt::{Answer, Prompt};
pub use recap::{CollectedDayNote, RECAP_QUESTIONS};
pub use resolver::{ResolverNotify, SystemResolver};
pub use session::SessionRecord;
pub use storage::StorageConfig;
pub use termination::{EndTrigger, SessionEnd, SessionRuntime};
pub use tracker::Tracker;
