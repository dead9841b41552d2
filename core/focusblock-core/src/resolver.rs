//! Resolver-cache invalidation boundary.
//!
//! Editing the hosts file does not take effect until the OS resolver cache is
//! flushed. The flush itself is an opaque external call: we fire the platform
//! command, log the result, and never let a failure abort a session.

use std::process::Command;
use std::sync::atomic::{AtomicU32, Ordering};

/// Notified after every block install and removal.
pub trait ResolverNotify {
    fn flush(&self);
}

/// Shells out to the platform's resolver flush command.
pub struct SystemResolver;

impl ResolverNotify for SystemResolver {
    fn flush(&self) {
        let status = if cfg!(target_os = "macos") {
            Command::new("dscacheutil").arg("-flushcache").status()
        } else {
            Command::new("resolvectl").arg("flush-caches").status()
        };
        match status {
            Ok(status) if status.success() => {
                tracing::debug!("Resolver cache flushed");
            }
            Ok(status) => {
                tracing::warn!(code = ?status.code(), "Resolver cache flush exited non-zero");
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to invoke resolver cache flush");
            }
        }
    }
}

/// Counts flushes, for tests.
#[derive(Default)]
pub struct RecordingResolver {
    flushes: AtomicU32,
}

impl RecordingResolver {
    pub fn flush_count(&self) -> u32 {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl ResolverNotify for RecordingResolver {
    fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::SeqCst);
    }
}
