//! OS signal wiring.
//!
//! The handler does exactly one async-signal-safe thing: bump a static
//! counter. The session runtime observes the counter through the
//! `InterruptSource` trait and makes every decision outside handler context.
//! `SA_RESTART` is deliberately not set so a signal can preempt a blocking
//! stdin read.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use focusblock_core::InterruptSource;

static SIGNAL_COUNT: AtomicU32 = AtomicU32::new(0);

extern "C" fn on_signal(_signum: libc::c_int) {
    SIGNAL_COUNT.fetch_add(1, Ordering::SeqCst);
}

/// Reads the handler's counter as an `InterruptSource`.
pub struct SignalInterrupts;

impl InterruptSource for SignalInterrupts {
    fn count(&self) -> u32 {
        SIGNAL_COUNT.load(Ordering::SeqCst)
    }
}

/// Installs the SIGINT/SIGTERM handler and returns the interrupt source.
pub fn install() -> Arc<dyn InterruptSource> {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = on_signal as libc::sighandler_t;
        libc::sigemptyset(&mut action.sa_mask);
        action.sa_flags = 0;
        libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut());
        libc::sigaction(libc::SIGTERM, &action, std::ptr::null_mut());
    }
    Arc::new(SignalInterrupts)
}
