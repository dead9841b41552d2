//! Session duration formatting and arithmetic.
//!
//! Durations live in note files as plain text, `"1 hours, 30 minutes"` or
//! `"45 minutes"`, and get summed when sessions are collected into a day
//! note. The unit words are fixed literals; the hours clause is omitted when
//! zero.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BlockerError, Result};

static DURATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+) hours, )?(\d+) minutes$").expect("valid duration regex"));

/// Formats a whole-minute duration as `"H hours, M minutes"`,
/// or just `"M minutes"` when under an hour.
pub fn format_duration(total_minutes: i64) -> String {
    let minutes = total_minutes.max(0);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{} hours, {} minutes", hours, minutes)
    } else {
        format!("{} minutes", minutes)
    }
}

/// Parses a duration string produced by [`format_duration`] back into
/// total minutes.
pub fn parse_duration(text: &str) -> Result<i64> {
    let captures = DURATION_PATTERN
        .captures(text.trim())
        .ok_or_else(|| BlockerError::InvalidDuration(text.to_string()))?;
    let hours: i64 = captures
        .get(1)
        .map(|m| m.as_str().parse().unwrap_or(0))
        .unwrap_or(0);
    let minutes: i64 = captures
        .get(2)
        .map(|m| m.as_str().parse().unwrap_or(0))
        .unwrap_or(0);
    Ok(hours * 60 + minutes)
}

/// Sums duration strings and reformats the total.
/// Fails on the first string that does not parse.
pub fn sum_durations<'a, I>(durations: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total = 0;
    for text in durations {
        total += parse_duration(text)?;
    }
    Ok(format_duration(total))
}
