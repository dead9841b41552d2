//! End-to-end session lifecycle scenarios on temp-directory fixtures.

use std::time::Duration;

use chrono::{Local, Timelike};
use focusblock_core::{
    hosts, recap, session, AtomicInterrupts, Divider, EndTrigger, SessionEnd, SessionRecord,
    SessionRuntime, StorageConfig, Tracker,
};
use focusblock_core::prompt::ScriptedPrompt;
use focusblock_core::resolver::RecordingResolver;
use tempfile::TempDir;

fn fixture() -> (TempDir, StorageConfig) {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_root(temp.path().to_path_buf());
    storage.ensure_dirs().unwrap();
    std::fs::write(
        storage.hosts_file(),
        "127.0.0.1 localhost\n::1 localhost\n",
    )
    .unwrap();
    (temp, storage)
}

fn sites(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn full_session_blocks_waits_and_collects_recap() {
    let (_temp, storage) = fixture();
    let before = std::fs::read_to_string(storage.hosts_file()).unwrap();

    // Start: install block and write the marker.
    let blocked = sites(&["x", "reddit"]);
    hosts::install(storage.hosts_file(), &blocked).unwrap();
    let hosts_content = std::fs::read_to_string(storage.hosts_file()).unwrap();
    for domain in ["x.com", "www.x.com", "reddit.com", "www.reddit.com"] {
        assert!(hosts_content.contains(&format!("0.0.0.0 {}", domain)));
    }

    let mut tracker = Tracker::load(&storage).unwrap();
    let start_time = Local::now().with_nanosecond(0).unwrap();
    session::begin(
        &storage,
        &SessionRecord {
            session_number: tracker.session_number(),
            start_time,
            end_time: Some(start_time),
            sites: blocked,
        },
    )
    .unwrap();

    // Timer elapses; recap is answered.
    let interrupts = AtomicInterrupts::new();
    let mut prompt = ScriptedPrompt::lines([
        "learned ownership",
        "",
        "stayed focused",
        "",
        "slow start",
        "",
    ]);
    let resolver = RecordingResolver::default();
    let mut runtime = SessionRuntime::new(
        &storage,
        &mut tracker,
        interrupts,
        &mut prompt,
        &resolver,
        Some(Divider::Bullet),
    )
    .with_poll_interval(Duration::from_millis(1));

    let trigger = runtime.wait(Some(start_time)).unwrap();
    assert_eq!(trigger, EndTrigger::Natural);
    let end = runtime.finish(trigger).unwrap();

    let SessionEnd::Completed { removed, note } = end else {
        panic!("expected a completed session");
    };
    assert_eq!(removed, vec!["reddit".to_string(), "x".to_string()]);

    // Hosts file restored byte for byte; marker gone; counter advanced.
    assert_eq!(std::fs::read_to_string(storage.hosts_file()).unwrap(), before);
    assert!(!session::is_active(&storage));
    assert_eq!(tracker.session_number(), 2);

    let note_content = std::fs::read_to_string(note).unwrap();
    assert!(note_content.contains("\u{2022} learned ownership"));
}

#[test]
fn forced_exit_cleans_up_without_any_input() {
    let (_temp, storage) = fixture();
    let blocked = sites(&["x"]);
    hosts::install(storage.hosts_file(), &blocked).unwrap();
    let mut tracker = Tracker::load(&storage).unwrap();
    session::begin(
        &storage,
        &SessionRecord {
            session_number: 1,
            start_time: Local::now().with_nanosecond(0).unwrap(),
            end_time: None,
            sites: blocked,
        },
    )
    .unwrap();

    // Two interrupts before the runtime can even prompt.
    let interrupts = AtomicInterrupts::new();
    interrupts.raise();
    interrupts.raise();
    let mut prompt = ScriptedPrompt::lines([]);
    let resolver = RecordingResolver::default();
    let mut runtime = SessionRuntime::new(
        &storage,
        &mut tracker,
        interrupts,
        &mut prompt,
        &resolver,
        None,
    );

    let trigger = runtime.wait(None).unwrap();
    assert_eq!(trigger, EndTrigger::Forced);
    runtime.finish(trigger).unwrap();

    assert!(!hosts::is_blocked(storage.hosts_file()).unwrap());
    assert!(!session::is_active(&storage));
    assert!(prompt.shown.is_empty());
    assert_eq!(resolver.flush_count(), 1);
}

#[test]
fn three_sessions_merge_into_one_day_note() {
    let (_temp, storage) = fixture();
    let mut tracker = Tracker::load(&storage).unwrap();

    // Capture three sessions of different lengths.
    for minutes in [10i64, 65, 20] {
        let start = Local::now().with_nanosecond(0).unwrap();
        let end = start + chrono::Duration::minutes(minutes);
        let mut prompt = ScriptedPrompt::lines(["did things", "", "yes", "", "no", ""]);
        recap::capture(
            &storage,
            &mut tracker,
            &mut prompt,
            start,
            end,
            Some(Divider::Dash),
        )
        .unwrap();
    }
    assert_eq!(tracker.session_number(), 4);

    let collected = recap::merge(&storage, &mut tracker, 1, 3, Divider::Bullet).unwrap();
    assert_eq!(collected.total_duration, "1 hours, 35 minutes");
    assert_eq!(collected.day_number, 1);
    assert_eq!(tracker.day_number(), 1);

    let content = std::fs::read_to_string(&collected.path).unwrap();
    // Dash-prefixed capture lines come back bullet-prefixed, never doubled.
    assert!(content.contains("\u{2022} did things"));
    assert!(!content.contains("\u{2022} - did things"));
}
