//! Line-input seam for every interactive dialogue.
//!
//! The library never reads stdin directly. The binary provides a prompt
//! backed by a reader thread that notices pending interrupts; tests provide
//! [`ScriptedPrompt`]. A prompt answer is one of three things: a line, a
//! cancellation (an interrupt arrived while the prompt was waiting), or end
//! of input.

use std::collections::VecDeque;

use crate::error::Result;

/// Outcome of one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Line(String),
    /// An interrupt was observed while waiting for input.
    Cancelled,
    /// Input is exhausted (stdin closed, or a test script ran out).
    Eof,
}

pub trait Prompt {
    /// Shows `text` and waits for one line of input.
    fn read_line(&mut self, text: &str) -> Result<Answer>;
}

/// Pre-scripted prompt for tests.
pub struct ScriptedPrompt {
    answers: VecDeque<Answer>,
    /// Every prompt text shown, for assertions.
    pub shown: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        ScriptedPrompt {
            answers: answers.into_iter().collect(),
            shown: Vec::new(),
        }
    }

    /// Convenience constructor from plain line strings.
    pub fn lines(lines: impl IntoIterator<Item = &'static str>) -> Self {
        Self::new(lines.into_iter().map(|l| Answer::Line(l.to_string())))
    }
}

impl Prompt for ScriptedPrompt {
    fn read_line(&mut self, text: &str) -> Result<Answer> {
        self.shown.push(text.to_string());
        Ok(self.answers.pop_front().unwrap_or(Answer::Eof))
    }
}
