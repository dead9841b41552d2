//! Interrupt delivery as an injectable event source.
//!
//! The OS signal handler in the binary only ever increments a counter; the
//! runtime diffs counts at well-defined points instead of reacting inside a
//! handler. That keeps the double-interrupt escape hatch testable without
//! delivering real signals: tests hand in an [`AtomicInterrupts`] and call
//! [`AtomicInterrupts::raise`] wherever a signal would land.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A monotone count of interrupt/termination signals received so far.
pub trait InterruptSource: Send + Sync {
    fn count(&self) -> u32;
}

/// Counter-backed interrupt source. The binary points this at the signal
/// handler's static; tests raise it directly.
#[derive(Default)]
pub struct AtomicInterrupts {
    count: AtomicU32,
}

impl AtomicInterrupts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records one delivered signal.
    pub fn raise(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

impl InterruptSource for AtomicInterrupts {
    fn count(&self) -> u32 {
        self.count.load(Ordering::SeqCst)
    }
}

/// Tracks how many interrupts have already been consumed, so each new signal
/// is observed exactly once.
pub struct InterruptWatcher {
    source: Arc<dyn InterruptSource>,
    seen: u32,
}

impl InterruptWatcher {
    pub fn new(source: Arc<dyn InterruptSource>) -> Self {
        InterruptWatcher { source, seen: 0 }
    }

    /// Returns how many unconsumed interrupts are pending and marks them seen.
    pub fn take_pending(&mut self) -> u32 {
        let current = self.source.count();
        let pending = current.saturating_sub(self.seen);
        self.seen = current;
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watcher_sees_each_interrupt_once() {
        let source = AtomicInterrupts::new();
        let mut watcher = InterruptWatcher::new(source.clone());

        assert_eq!(watcher.take_pending(), 0);
        source.raise();
        assert_eq!(watcher.take_pending(), 1);
        assert_eq!(watcher.take_pending(), 0);
    }

    #[test]
    fn test_watcher_batches_rapid_interrupts() {
        let source = AtomicInterrupts::new();
        let mut watcher = InterruptWatcher::new(source.clone());

        source.raise();
        source.raise();
        assert_eq!(watcher.take_pending(), 2);
    }

    #[test]
    fn test_watcher_counts_interrupts_raised_before_construction() {
        let source = AtomicInterrupts::new();
        source.raise();
        let mut watcher = InterruptWatcher::new(source.clone());
        assert_eq!(watcher.take_pending(), 1);
    }
}
