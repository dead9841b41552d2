//! Stdin-backed prompt that a signal can cancel.
//!
//! `read_line` on the main thread would swallow interrupts (std retries
//! EINTR internally), so a background thread owns stdin and hands lines over
//! a channel. The prompt polls the channel with a short timeout, checking the
//! interrupt counter between polls; a signal delivered while a prompt is
//! pending surfaces as `Answer::Cancelled` instead of nesting another
//! dialogue.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use focusblock_core::{Answer, InterruptSource, Prompt, Result};

const POLL_INTERVAL_MS: u64 = 100;

pub struct StdinPrompt {
    lines: Receiver<Option<String>>,
    interrupts: Arc<dyn InterruptSource>,
}

impl StdinPrompt {
    pub fn new(interrupts: Arc<dyn InterruptSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(Some(line)).is_err() {
                            return;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = tx.send(None);
        });
        StdinPrompt {
            lines: rx,
            interrupts,
        }
    }
}

impl Prompt for StdinPrompt {
    fn read_line(&mut self, text: &str) -> Result<Answer> {
        print!("{}", text);
        let _ = std::io::stdout().flush();

        let baseline = self.interrupts.count();
        loop {
            if self.interrupts.count() > baseline {
                return Ok(Answer::Cancelled);
            }
            match self.lines.recv_timeout(Duration::from_millis(POLL_INTERVAL_MS)) {
                Ok(Some(line)) => return Ok(Answer::Line(line)),
                Ok(None) => return Ok(Answer::Eof),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(Answer::Eof),
            }
        }
    }
}
