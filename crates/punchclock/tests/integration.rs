//! Integration tests for punchclock
//!
//! These drive whole sessions through the dispatcher with a file-backed
//! alias store and time log, and a mock process host.

use punch_api::{CommandKeyword, EntryKind, SessionStatus, TimerSelector};
use punch_config::{parse_config, AliasMatch};
use punch_core::{AliasStore, CommandDispatcher, CommandInput, CommandRegistry, SessionContext};
use punch_host_api::MockProcessControl;
use punch_store::{FileTimeLog, MemoryTimeLog, SqliteStore, TimeLog};
use punch_util::Moment;
use std::sync::Arc;
use std::time::Duration;

const NS: &str = "Software/Punchclock/Alias";

fn mins(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

fn memory_session(
    system_events: bool,
) -> (CommandDispatcher, Arc<MemoryTimeLog>, Arc<MockProcessControl>) {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let aliases = AliasStore::new(store, NS, "alice", AliasMatch::Contains);
    let log = Arc::new(MemoryTimeLog::new());
    let host = Arc::new(MockProcessControl::new());
    let context = SessionContext::new(aliases, host.clone(), log.clone(), system_events);
    (
        CommandDispatcher::new(CommandRegistry::standard(), context),
        log,
        host,
    )
}

fn send(dispatcher: &mut CommandDispatcher, line: &str, now: Moment) -> Vec<CommandKeyword> {
    dispatcher.dispatch(&CommandInput::parse(line), now)
}

#[test]
fn test_full_workday() {
    let (mut d, log, _) = memory_session(false);
    let t0 = Moment::now();

    let mut statuses = vec![d.context().session.status()];
    for (line, at) in [
        ("in", t0),
        ("rest", t0.after(mins(50))),
        ("resume", t0.after(mins(60))),
        ("out", t0.after(mins(120))),
    ] {
        send(&mut d, line, at);
        statuses.push(d.context().session.status());
    }

    assert_eq!(
        statuses,
        vec![
            SessionStatus::Inactive,
            SessionStatus::Active,
            SessionStatus::OnRest,
            SessionStatus::Active,
            SessionStatus::Inactive,
        ]
    );

    // 50 minutes before the break plus 60 after it
    let tracker = d.context().session.tracker();
    let later = t0.after(mins(240)).mono;
    assert_eq!(tracker.duration(TimerSelector::Cumulative, later), mins(110));
    assert_eq!(tracker.duration(TimerSelector::Segment, later), mins(60));

    let messages = log.messages();
    assert_eq!(
        messages.last().map(String::as_str),
        Some("SESSION RUNTIME: 01:00:00.00 | CUMULATIVE SESSION RUNTIME: 01:50:00.00")
    );
}

#[test]
fn test_query_with_garbage_argument_reads_cumulative() {
    let (mut d, log, _) = memory_session(false);
    let t0 = Moment::now();

    send(&mut d, "in", t0);
    send(&mut d, "rest", t0.after(mins(30)));
    send(&mut d, "resume", t0.after(mins(45)));
    log.clear();

    let now = t0.after(mins(60));
    // GETMINS contains IN, which punches in again and restarts the segment
    let fired = send(&mut d, "GETMINS xyz", now);
    assert_eq!(fired, vec![CommandKeyword::In, CommandKeyword::GetMinutes]);
    send(&mut d, "GETMINS", now);

    let minutes: Vec<_> = log
        .entries()
        .into_iter()
        .filter(|e| e.kind == EntryKind::Null)
        .filter_map(|e| e.message)
        .collect();
    assert_eq!(
        minutes,
        vec!["Session Runtime in Minutes: 45", "Session Runtime in Minutes: 45"]
    );
}

#[test]
fn test_alias_lifecycle_and_partial_failure() {
    let (mut d, log, host) = memory_session(true);
    let now = Moment::now();

    send(&mut d, "genalikey", now);
    send(&mut d, r#"newali "editor|browser|mail" "morning routine""#, now);
    host.fail_on("browser");
    log.clear();

    send(&mut d, r#"open "morning""#, now);

    assert_eq!(host.launched(), vec!["editor", "mail"]);
    let kinds: Vec<_> = log.entries().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::ProcessStartRequest,
            EntryKind::SystemPost,
            EntryKind::SystemError,
            EntryKind::SystemPost,
        ]
    );

    send(&mut d, r#"close "editor""#, now);
    assert_eq!(host.running_names(), vec!["mail"]);
}

#[test]
fn test_alias_store_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("punchclock.db");

    {
        let store = Arc::new(SqliteStore::open(&db_path).unwrap());
        let aliases = AliasStore::new(store, NS, "alice", AliasMatch::Contains);
        aliases.ensure_namespace().unwrap();
        aliases.put("work", "code|firefox").unwrap();
    }

    let store = Arc::new(SqliteStore::open(&db_path).unwrap());
    let aliases = AliasStore::new(store, NS, "alice", AliasMatch::Contains);
    assert_eq!(aliases.resolve("wor"), Some("code|firefox".into()));
}

#[test]
fn test_time_log_file_and_retarget() {
    let dir = tempfile::tempdir().unwrap();
    let moved = dir.path().join("moved");
    let started = punch_util::now();

    let file_log = Arc::new(FileTimeLog::new(dir.path(), started).unwrap());
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let aliases = AliasStore::new(store, NS, "alice", AliasMatch::Contains);
    let context = SessionContext::new(
        aliases,
        Arc::new(MockProcessControl::new()),
        file_log.clone(),
        false,
    );
    let mut d = CommandDispatcher::new(CommandRegistry::standard(), context);

    let t0 = Moment::now();
    send(&mut d, r#"post "planning""#, t0);
    let first = file_log.target().unwrap();

    send(&mut d, &format!(r#"logtar "{}""#, moved.display()), t0);
    send(&mut d, "end", t0);

    let before = std::fs::read_to_string(&first).unwrap();
    assert_eq!(before.lines().count(), 1);
    assert!(before.contains("POST     planning"));

    let after = std::fs::read_to_string(file_log.target().unwrap()).unwrap();
    assert!(after.starts_with(&format!("[{}", started.format("%Y-%m-%d"))));
    assert!(after.contains("Time log now written to"));
    assert!(after.contains("End of Time Logging Session!"));
    assert!(d.is_finished());
}

#[test]
fn test_config_seeds_aliases() {
    let settings = parse_config(
        r#"
        config_version = 1

        [session]
        alias_match = "exact"
        system_events = true
        account = "alice"

        [[aliases]]
        name = "work"
        targets = ["code", "firefox"]
        "#,
    )
    .unwrap();

    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let aliases = AliasStore::new(
        store,
        settings.session.alias_namespace.clone(),
        settings.session.account.clone(),
        settings.session.alias_match,
    );
    aliases.ensure_namespace().unwrap();
    assert_eq!(aliases.seed(&settings.aliases).unwrap(), 1);

    let host = Arc::new(MockProcessControl::new());
    let log = Arc::new(MemoryTimeLog::new());
    let context = SessionContext::new(aliases, host.clone(), log, settings.session.system_events);
    let mut d = CommandDispatcher::new(CommandRegistry::standard(), context);

    // exact matching: a partial name is launched verbatim
    send(&mut d, r#"open "wor""#, Moment::now());
    send(&mut d, r#"open "work""#, Moment::now());
    assert_eq!(host.launched(), vec!["wor", "code", "firefox"]);
}
