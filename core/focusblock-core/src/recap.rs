//! Post-session recap capture and multi-session merge.
//!
//! At session end the user answers a fixed list of questions; each answer is
//! a block of divider-prefixed lines. The note lands at
//! `session_notes/session_<NN>.md`:
//!
//! ```text
//! **Session 4 - 1 hours, 5 minutes**
//!
//! **1) What did you learn / work on?**
//! • wrote the merge path
//! • fixed the footer scan
//!
//! **2) What went well?**
//! ...
//! ```
//!
//! `collect` later merges an inclusive session range into one day note,
//! summing durations and re-prefixing every answer line with the merge's
//! divider. Notes are written once and never mutated; the merge only reads.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use fs_err as fs;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::divider::{Divider, ALL_DIVIDERS};
use crate::duration::{format_duration, sum_durations};
use crate::error::{BlockerError, Result};
use crate::prompt::{Answer, Prompt};
use crate::storage::StorageConfig;
use crate::tracker::Tracker;

/// The fixed recap questions, asked in order.
pub const RECAP_QUESTIONS: [&str; 3] = [
    "1) What did you learn / work on?",
    "2) What went well?",
    "3) What didn't go well?",
];

static NOTE_HEADER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Session \d+ - (.+?)\*\*").expect("valid note header regex"));

/// One session's recap, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecapNote {
    pub session_number: u32,
    pub duration: String,
    /// Per question, the divider-prefixed answer lines.
    pub answers: Vec<Vec<String>>,
}

/// Summary of a completed merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedDayNote {
    pub day_number: u32,
    pub total_duration: String,
    pub sessions_merged: Vec<u32>,
    pub path: PathBuf,
}

/// Resolves the divider to use: explicit choice, then the stored default,
/// then an interactive first-run prompt whose answer becomes the new default.
pub fn resolve_divider(
    explicit: Option<Divider>,
    tracker: &mut Tracker,
    prompt: &mut dyn Prompt,
) -> Result<Divider> {
    if let Some(divider) = explicit {
        return Ok(divider);
    }
    if let Some(divider) = tracker.default_divider() {
        return Ok(divider);
    }

    let menu = ALL_DIVIDERS
        .iter()
        .enumerate()
        .map(|(i, d)| format!("  {}. {}", i + 1, d))
        .collect::<Vec<_>>()
        .join("\n");
    loop {
        let text = format!("Choose a divider for your notes:\n{}\nEnter 1-3: ", menu);
        match prompt.read_line(&text)? {
            Answer::Line(choice) => {
                let choice = choice.trim();
                let picked = choice
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| ALL_DIVIDERS.get(i.wrapping_sub(1)).copied())
                    .or_else(|| Divider::parse(choice).ok());
                match picked {
                    Some(divider) => {
                        tracker.set_default_divider(divider)?;
                        return Ok(divider);
                    }
                    // Invalid choices are re-prompted, never defaulted.
                    None => continue,
                }
            }
            Answer::Cancelled | Answer::Eof => return Err(BlockerError::RecapCancelled),
        }
    }
}

/// Runs the end-of-session Q&A and writes the note file.
///
/// Answers are read line by line until a blank line; every line is prefixed
/// with the divider. An interrupt or EOF mid-capture aborts only the recap.
/// On success the session counter advances.
pub fn capture(
    storage: &StorageConfig,
    tracker: &mut Tracker,
    prompt: &mut dyn Prompt,
    start_time: DateTime<Local>,
    end_time: DateTime<Local>,
    explicit_divider: Option<Divider>,
) -> Result<PathBuf> {
    let divider = resolve_divider(explicit_divider, tracker, prompt)?;
    let minutes = end_time.signed_duration_since(start_time).num_minutes();
    let session_number = tracker.session_number();

    let mut answers = Vec::with_capacity(RECAP_QUESTIONS.len());
    for question in RECAP_QUESTIONS {
        let mut lines = Vec::new();
        let mut text = format!("\n{}\n(blank line to finish)\n", question);
        loop {
            match prompt.read_line(&text)? {
                Answer::Line(line) if line.trim().is_empty() => break,
                Answer::Line(line) => lines.push(divider.apply(&line)),
                Answer::Cancelled | Answer::Eof => return Err(BlockerError::RecapCancelled),
            }
            text = String::new();
        }
        answers.push(lines);
    }

    let note = RecapNote {
        session_number,
        duration: format_duration(minutes),
        answers,
    };

    storage
        .ensure_dirs()
        .map_err(|err| BlockerError::io("creating note directories", err))?;
    let path = storage.note_file(session_number);
    fs::write(&path, render_note(&note)).map_err(|err| BlockerError::io("writing recap note", err))?;
    tracker.advance_session()?;

    tracing::info!(session = session_number, path = %path.display(), "Recap note written");
    Ok(path)
}

/// Merges the notes for an inclusive session range into one day note.
///
/// Missing notes are warned about and skipped; a range with no notes at all
/// is an error. On success the day counter advances.
pub fn merge(
    storage: &StorageConfig,
    tracker: &mut Tracker,
    first: u32,
    last: u32,
    divider: Divider,
) -> Result<CollectedDayNote> {
    let mut durations = Vec::new();
    let mut merged_answers: Vec<Vec<String>> = vec![Vec::new(); RECAP_QUESTIONS.len()];
    let mut sessions_merged = Vec::new();

    for session_number in first..=last {
        let path = storage.note_file(session_number);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(session = session_number, path = %path.display(), "Recap note missing; skipping");
                continue;
            }
            Err(err) => return Err(BlockerError::io("reading recap note", err)),
        };

        match extract_duration(&content) {
            Some(duration) => durations.push(duration),
            None => {
                tracing::warn!(session = session_number, "Recap note has no duration header");
            }
        }
        for (i, question) in RECAP_QUESTIONS.iter().enumerate() {
            for line in extract_answer(&content, question) {
                merged_answers[i].push(divider.apply(&line));
            }
        }
        sessions_merged.push(session_number);
    }

    if sessions_merged.is_empty() {
        return Err(BlockerError::NoNotesFound { first, last });
    }

    let total_duration = sum_durations(durations.iter().map(String::as_str))?;
    let day_number = tracker.day_number() + 1;

    let mut content = format!("**Day {}**\n", day_number);
    content.push_str(&format!("Total duration: {}\n", total_duration));
    for (question, lines) in RECAP_QUESTIONS.iter().zip(&merged_answers) {
        content.push_str(&format!("\n**{}**\n", question));
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
    }

    storage
        .ensure_dirs()
        .map_err(|err| BlockerError::io("creating collected directory", err))?;
    let path = storage.collected_file(day_number, first, last);
    fs::write(&path, content).map_err(|err| BlockerError::io("writing day note", err))?;
    tracker.advance_day()?;

    tracing::info!(day = day_number, sessions = sessions_merged.len(), path = %path.display(), "Day note written");
    Ok(CollectedDayNote {
        day_number,
        total_duration,
        sessions_merged,
        path,
    })
}

fn render_note(note: &RecapNote) -> String {
    let mut content = format!("**Session {} - {}**\n", note.session_number, note.duration);
    for (question, lines) in RECAP_QUESTIONS.iter().zip(&note.answers) {
        content.push_str(&format!("\n**{}**\n", question));
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
    }
    content
}

/// Pulls the duration string out of a note's header line.
fn extract_duration(content: &str) -> Option<String> {
    NOTE_HEADER_PATTERN
        .captures(content)
        .map(|captures| captures[1].to_string())
}

/// Returns a question's answer lines: everything between the question's
/// `**...**` heading and the next heading, minus blanks.
fn extract_answer(content: &str, question: &str) -> Vec<String> {
    let heading = format!("**{}**", question);
    let mut lines = Vec::new();
    let mut collecting = false;
    for line in content.lines() {
        if collecting {
            if line.starts_with("**") {
                break;
            }
            if !line.trim().is_empty() {
                lines.push(line.to_string());
            }
        } else if line.trim() == heading {
            collecting = true;
        }
    }
    lines
}
