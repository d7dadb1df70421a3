//! Built-in command handlers
//!
//! Each handler turns one command into session transitions and log
//! entries. Recoverable failures end here as a single SYSTEM_ERROR entry.

use punch_api::{CommandKeyword, DisplayHint, DurationUnit, EntryKind, LogEntry, TimerSelector};
use punch_host_api::{ProcessHandle, StopMode};
use punch_util::{format_clock_time, Moment};
use std::path::Path;
use tracing::{debug, warn};

use crate::{AliasError, CommandInput, Handler, NamespaceOutcome, SessionContext, TrackedProcesses};

pub(crate) fn handler_for(keyword: CommandKeyword) -> Handler {
    match keyword {
        CommandKeyword::Post => post,
        CommandKeyword::In => punch_in,
        CommandKeyword::Rest => rest,
        CommandKeyword::Resume => resume,
        CommandKeyword::Out => punch_out,
        CommandKeyword::Open => open,
        CommandKeyword::Close => close,
        CommandKeyword::Hotkey => hotkey,
        CommandKeyword::SysListen => system_listen,
        CommandKeyword::LogTarget => log_target,
        CommandKeyword::SessionTime => session_time,
        CommandKeyword::Print => print,
        CommandKeyword::NewAlias => new_alias,
        CommandKeyword::GenAliasKey => generate_alias_key,
        CommandKeyword::GetHours => get_hours,
        CommandKeyword::GetMinutes => get_minutes,
        CommandKeyword::GetSeconds => get_seconds,
        CommandKeyword::Help => help,
        CommandKeyword::End => end,
    }
}

fn system_error(ctx: &SessionContext, message: impl Into<String>, now: Moment) {
    ctx.emit(
        LogEntry::new(EntryKind::SystemError, message)
            .with_hint(DisplayHint::Red)
            .at(now.wall),
    );
}

fn system_post(ctx: &SessionContext, message: impl Into<String>, now: Moment) {
    ctx.emit(
        LogEntry::new(EntryKind::SystemPost, message)
            .with_hint(DisplayHint::Yellow)
            .at(now.wall),
    );
}

fn note(ctx: &SessionContext, message: impl Into<String>, now: Moment) {
    ctx.emit(LogEntry::new(EntryKind::Null, message).at(now.wall));
}

/// Primary payload, falling back to the first positional argument
fn payload(input: &CommandInput) -> Option<&str> {
    input
        .primary()
        .or_else(|| input.arg(1))
        .filter(|p| !p.trim().is_empty())
}

fn post(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    // POST has no secondary payload, so every quoted token is part of the message
    let message = if input.quoted.is_empty() {
        input.args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default()
    } else {
        input.quoted.join(" ")
    };
    if message.trim().is_empty() {
        system_error(ctx, "Nothing to post. Usage: post \"message\"", now);
        return;
    }
    ctx.emit(LogEntry::new(EntryKind::Post, message).at(now.wall));
}

fn punch_in(ctx: &mut SessionContext, _input: &CommandInput, now: Moment) {
    let entry = ctx.session.punch_in(now);
    ctx.emit(entry);
}

fn rest(ctx: &mut SessionContext, _input: &CommandInput, now: Moment) {
    let entry = ctx.session.rest(now);
    ctx.emit(entry);
}

fn resume(ctx: &mut SessionContext, _input: &CommandInput, now: Moment) {
    let entry = ctx.session.resume(now);
    ctx.emit(entry);
}

fn punch_out(ctx: &mut SessionContext, _input: &CommandInput, now: Moment) {
    let entry = ctx.session.punch_out(now);
    ctx.emit(entry);
}

fn end(ctx: &mut SessionContext, _input: &CommandInput, now: Moment) {
    let entry = ctx.session.end(now);
    ctx.emit(entry);
}

fn open(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    let Some(target) = payload(input) else {
        system_error(ctx, "Nothing to open. Usage: open \"target|alias\"", now);
        return;
    };

    ctx.emit(
        LogEntry::new(EntryKind::ProcessStartRequest, format!("Opening {}...", target))
            .with_hint(DisplayHint::Yellow)
            .at(now.wall),
    );

    let report = ctx.aliases.resolve_and_launch(
        target,
        ctx.host.as_ref(),
        &mut ctx.tracked,
        ctx.log.as_ref(),
        now,
    );
    debug!(
        target,
        started = report.started.len(),
        failed = report.failed.len(),
        "Open finished"
    );
}

fn close(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    let Some(name) = payload(input) else {
        system_error(ctx, "Nothing to close. Usage: close \"name\"", now);
        return;
    };
    let name = name.to_string();

    system_post(ctx, format!("Closing {}...", name), now);

    let tracked_handles = |tracked: &TrackedProcesses| -> Vec<ProcessHandle> {
        tracked.find(&name).into_iter().map(|p| p.handle.clone()).collect()
    };

    let mut handles = tracked_handles(&ctx.tracked);
    // The snapshot goes stale as processes come and go; rebuild it once on a miss
    if handles.is_empty() {
        match ctx.tracked.refresh(ctx.host.as_ref()) {
            Ok(()) => handles = tracked_handles(&ctx.tracked),
            Err(e) => warn!(error = %e, "Failed to rebuild process snapshot"),
        }
    }

    if handles.is_empty() {
        system_error(ctx, format!("No tracked process named {}", name), now);
        return;
    }

    for handle in &handles {
        match ctx.host.stop(handle, StopMode::Graceful) {
            Ok(()) => system_post(ctx, format!("Process {} closed.", handle.name), now),
            Err(e) => system_error(
                ctx,
                format!("Failed to close process {}... REASON: {}", handle.name, e),
                now,
            ),
        }
    }
    ctx.tracked.remove(&name);
}

fn hotkey(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    let mut key_chars = input.arg(1).unwrap_or_default().chars();
    let key = match (key_chars.next(), key_chars.next()) {
        (Some(c), None) => c.to_ascii_uppercase(),
        _ => {
            system_error(ctx, "Hotkey must be a single character. Usage: hotkey <key> <index>", now);
            return;
        }
    };

    let command = input
        .arg(2)
        .and_then(|i| i.trim().parse::<usize>().ok())
        .and_then(CommandKeyword::from_index);
    let Some(command) = command else {
        system_error(
            ctx,
            format!(
                "Unknown command index {}. Expected 1 to {}",
                input.arg(2).unwrap_or("(none)"),
                CommandKeyword::ALL.len()
            ),
            now,
        );
        return;
    };

    ctx.hotkeys.insert(key, command);
    system_post(ctx, format!("Key {} set to {} command.", key, command), now);
    system_post(ctx, "Hold ALT then the hotkey you've registered.", now);
}

fn system_listen(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    let enabled = match input.arg(1).map(|a| a.trim().to_ascii_lowercase()) {
        None => !ctx.system_events,
        Some(value) if value == "true" => true,
        Some(value) if value == "false" => false,
        Some(value) => {
            system_error(
                ctx,
                format!("Invalid value {}. Usage: syslis [true|false]", value),
                now,
            );
            return;
        }
    };

    ctx.system_events = enabled;
    let message = if enabled {
        "System Now Listening. System Events will now be logged."
    } else {
        "System Has Stopped Listening. System Events will not be logged."
    };
    system_post(ctx, message, now);
}

fn log_target(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    let Some(dir) = payload(input) else {
        system_error(ctx, "No directory given. Usage: logtar \"dir\"", now);
        return;
    };

    match ctx.log.retarget(Path::new(dir)) {
        Ok(path) => system_post(ctx, format!("Time log now written to {}", path.display()), now),
        Err(e) => system_error(
            ctx,
            format!("Failed to change log target to {}... REASON: {}", dir, e),
            now,
        ),
    }
}

fn session_time(ctx: &mut SessionContext, _input: &CommandInput, now: Moment) {
    let summary = ctx.session.tracker().summary(now.mono);
    note(ctx, summary, now);
}

fn print(ctx: &mut SessionContext, _input: &CommandInput, now: Moment) {
    let session = &ctx.session;
    let mark = |t: Option<chrono::DateTime<chrono::Local>>| {
        t.map(|t| format_clock_time(&t))
            .unwrap_or_else(|| "Never".to_string())
    };

    let mut lines = vec![
        format!("Session ID: {}", ctx.session_id),
        format!("Status: {}", session.status()),
        format!("Last Punch In: {}", mark(session.last_punch_in())),
        format!("Last Punch Out: {}", mark(session.last_punch_out())),
        session.tracker().summary(now.mono),
        format!(
            "System Events: {}",
            if ctx.system_events { "listening" } else { "ignored" }
        ),
    ];
    if let Some(target) = ctx.log.target() {
        lines.push(format!("Log Target: {}", target.display()));
    }
    for (key, command) in &ctx.hotkeys {
        lines.push(format!("Hotkey ALT+{}: {}", key, command));
    }

    for line in lines {
        note(ctx, line, now);
    }
}

fn new_alias(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    let (Some(value), Some(name)) = (input.primary(), input.secondary()) else {
        system_error(
            ctx,
            "Failed to add new alias. Usage: newali \"targets\" \"name\"",
            now,
        );
        return;
    };

    match ctx.aliases.put(name, value) {
        Ok(()) => system_post(
            ctx,
            format!("Alias {} added successfully! Process(s): {}", name, value),
            now,
        ),
        Err(e @ AliasError::NamespaceMissing(_)) => system_error(
            ctx,
            format!(
                "Failed to add new alias {}. REASON CODE: {} ({}). If the alias store does not exist, use command \"genalikey\"",
                name,
                e.reason_code(),
                e
            ),
            now,
        ),
        Err(e) => system_error(
            ctx,
            format!(
                "Failed to add new alias {}. REASON CODE: {} ({})",
                name,
                e.reason_code(),
                e
            ),
            now,
        ),
    }
}

fn generate_alias_key(ctx: &mut SessionContext, _input: &CommandInput, now: Moment) {
    match ctx.aliases.ensure_namespace() {
        Ok(NamespaceOutcome::Created) => {
            system_post(ctx, "Alias store has been generated...", now)
        }
        Ok(NamespaceOutcome::AlreadyExists) => {
            system_post(ctx, "Alias store has already been generated.", now)
        }
        Err(e) => system_error(
            ctx,
            format!(
                "Failed to generate alias store. REASON CODE: {} ({})",
                e.reason_code(),
                e
            ),
            now,
        ),
    }
}

fn runtime_in(ctx: &SessionContext, input: &CommandInput, unit: DurationUnit, now: Moment) {
    let selector = TimerSelector::from_arg(input.arg(1));
    let value = ctx.session.tracker().elapsed(selector, now.mono).in_unit(unit);
    note(ctx, format!("Session Runtime in {}: {}", unit.label(), value), now);
}

fn get_hours(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    runtime_in(ctx, input, DurationUnit::Hours, now);
}

fn get_minutes(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    runtime_in(ctx, input, DurationUnit::Minutes, now);
}

fn get_seconds(ctx: &mut SessionContext, input: &CommandInput, now: Moment) {
    runtime_in(ctx, input, DurationUnit::Seconds, now);
}

fn help(ctx: &mut SessionContext, _input: &CommandInput, now: Moment) {
    for keyword in CommandKeyword::ALL {
        note(ctx, format!("{:>2}  {}", keyword.index(), keyword.usage()), now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use punch_config::AliasMatch;
    use punch_api::SessionStatus;
    use punch_host_api::{MockProcessControl, ProcessControl};
    use punch_store::{MemoryTimeLog, SqliteStore, TimeLog};
    use std::sync::Arc;
    use std::time::Duration;

    struct Harness {
        ctx: SessionContext,
        log: Arc<MemoryTimeLog>,
        host: Arc<MockProcessControl>,
    }

    fn harness() -> Harness {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let aliases = crate::AliasStore::new(store, "ns", "alice", AliasMatch::Contains);
        let log = Arc::new(MemoryTimeLog::new());
        let host = Arc::new(MockProcessControl::new());
        let ctx = SessionContext::new(aliases, host.clone(), log.clone(), true);
        Harness { ctx, log, host }
    }

    fn run(h: &mut Harness, keyword: CommandKeyword, line: &str, now: Moment) {
        handler_for(keyword)(&mut h.ctx, &CommandInput::parse(line), now);
    }

    fn last_message(h: &Harness) -> String {
        h.log.messages().pop().unwrap_or_default()
    }

    #[test]
    fn post_logs_primary_payload() {
        let mut h = harness();
        run(&mut h, CommandKeyword::Post, r#"post "standup done""#, Moment::now());
        let entries = h.log.entries();
        assert_eq!(entries[0].kind, EntryKind::Post);
        assert_eq!(entries[0].message.as_deref(), Some("standup done"));
    }

    #[test]
    fn post_reads_the_same_from_argv_and_typed_line() {
        let mut h = harness();
        let now = Moment::now();
        let argv = CommandInput::from_args(vec!["post".into(), "hello".into(), "world".into()]);
        handler_for(CommandKeyword::Post)(&mut h.ctx, &argv, now);
        run(&mut h, CommandKeyword::Post, "post hello world", now);
        run(&mut h, CommandKeyword::Post, r#"post "hello world""#, now);

        assert_eq!(h.log.messages(), vec!["hello world"; 3]);
    }

    #[test]
    fn post_without_payload_is_an_error() {
        let mut h = harness();
        run(&mut h, CommandKeyword::Post, "post", Moment::now());
        assert_eq!(h.log.entries()[0].kind, EntryKind::SystemError);
    }

    #[test]
    fn open_logs_request_then_launch() {
        let mut h = harness();
        run(&mut h, CommandKeyword::Open, r#"open "firefox""#, Moment::now());
        assert_eq!(
            h.log.messages(),
            vec!["Opening firefox...", "Process firefox started successfully!"]
        );
        assert_eq!(h.log.entries()[0].kind, EntryKind::ProcessStartRequest);
    }

    #[test]
    fn close_stops_tracked_processes() {
        let mut h = harness();
        let now = Moment::now();
        run(&mut h, CommandKeyword::Open, r#"open "firefox""#, now);
        run(&mut h, CommandKeyword::Close, r#"close "firefox""#, now);

        assert!(h.host.running_names().is_empty());
        assert_eq!(last_message(&h), "Process firefox closed.");
    }

    #[test]
    fn close_rebuilds_empty_snapshot() {
        let mut h = harness();
        h.host.start("editor").unwrap();
        assert!(h.ctx.tracked.is_empty());

        run(&mut h, CommandKeyword::Close, r#"close "editor""#, Moment::now());
        assert!(h.host.running_names().is_empty());
    }

    #[test]
    fn close_finds_process_started_after_snapshot() {
        let mut h = harness();
        let now = Moment::now();
        run(&mut h, CommandKeyword::Open, r#"open "firefox""#, now);
        assert!(!h.ctx.tracked.is_empty());
        h.host.start("editor").unwrap();

        run(&mut h, CommandKeyword::Close, r#"close "editor""#, now);
        assert_eq!(h.host.running_names(), vec!["firefox".to_string()]);
        assert_eq!(last_message(&h), "Process editor closed.");
    }

    #[test]
    fn close_unknown_reports_error() {
        let mut h = harness();
        run(&mut h, CommandKeyword::Close, r#"close "ghost""#, Moment::now());
        let entries = h.log.entries();
        assert_eq!(entries.last().unwrap().kind, EntryKind::SystemError);
    }

    #[test]
    fn hotkey_binds_by_index() {
        let mut h = harness();
        run(&mut h, CommandKeyword::Hotkey, "hotkey p 2", Moment::now());
        assert_eq!(h.ctx.hotkeys.get(&'P'), Some(&CommandKeyword::In));
        assert_eq!(
            h.log.messages(),
            vec!["Key P set to IN command.", "Hold ALT then the hotkey you've registered."]
        );
    }

    #[test]
    fn hotkey_rejects_bad_index() {
        let mut h = harness();
        run(&mut h, CommandKeyword::Hotkey, "hotkey p 0", Moment::now());
        run(&mut h, CommandKeyword::Hotkey, "hotkey pp 2", Moment::now());
        assert!(h.ctx.hotkeys.is_empty());
        assert!(h.log.entries().iter().all(|e| e.kind == EntryKind::SystemError));
    }

    #[test]
    fn syslis_parses_and_toggles() {
        let mut h = harness();
        let now = Moment::now();

        run(&mut h, CommandKeyword::SysListen, "syslis FALSE", now);
        assert!(!h.ctx.system_events);
        run(&mut h, CommandKeyword::SysListen, "syslis", now);
        assert!(h.ctx.system_events);

        run(&mut h, CommandKeyword::SysListen, "syslis maybe", now);
        assert!(h.ctx.system_events);
        assert_eq!(h.log.entries().last().unwrap().kind, EntryKind::SystemError);
    }

    #[test]
    fn logtar_retargets_sink() {
        let mut h = harness();
        run(&mut h, CommandKeyword::LogTarget, r#"logtar "/tmp/punch logs""#, Moment::now());
        assert_eq!(
            h.log.target(),
            Some(Path::new("/tmp/punch logs").join("timelog.log"))
        );
    }

    #[test]
    fn newali_without_namespace_hints_genalikey() {
        let mut h = harness();
        run(&mut h, CommandKeyword::NewAlias, r#"newali "code" "work""#, Moment::now());
        let entry = h.log.entries().pop().unwrap();
        assert_eq!(entry.kind, EntryKind::SystemError);
        let message = entry.message.unwrap();
        assert!(message.contains("REASON CODE: NAMESPACE_MISSING"));
        assert!(message.contains("use command \"genalikey\""));
    }

    #[test]
    fn genalikey_then_newali() {
        let mut h = harness();
        let now = Moment::now();
        run(&mut h, CommandKeyword::GenAliasKey, "genalikey", now);
        run(&mut h, CommandKeyword::GenAliasKey, "genalikey", now);
        run(&mut h, CommandKeyword::NewAlias, r#"newali "code|firefox" "work""#, now);

        assert_eq!(
            h.log.messages(),
            vec![
                "Alias store has been generated...",
                "Alias store has already been generated.",
                "Alias work added successfully! Process(s): code|firefox",
            ]
        );
        assert_eq!(h.ctx.aliases.resolve("work"), Some("code|firefox".into()));
    }

    #[test]
    fn runtime_queries_select_timer() {
        let mut h = harness();
        let t0 = Moment::now();
        run(&mut h, CommandKeyword::In, "in", t0);
        run(&mut h, CommandKeyword::Rest, "rest", t0.after(Duration::from_secs(60)));
        run(&mut h, CommandKeyword::Resume, "resume", t0.after(Duration::from_secs(120)));
        h.log.clear();

        let later = t0.after(Duration::from_secs(150));
        run(&mut h, CommandKeyword::GetSeconds, "getsecs 1", later);
        run(&mut h, CommandKeyword::GetSeconds, "getsecs", later);
        run(&mut h, CommandKeyword::GetMinutes, "getmins xyz", later);

        assert_eq!(
            h.log.messages(),
            vec![
                "Session Runtime in Seconds: 30",
                "Session Runtime in Seconds: 90",
                "Session Runtime in Minutes: 1.5",
            ]
        );
    }

    #[test]
    fn print_summarizes_session() {
        let mut h = harness();
        let now = Moment::now();
        run(&mut h, CommandKeyword::In, "in", now);
        h.log.clear();

        run(&mut h, CommandKeyword::Print, "print", now);
        let messages = h.log.messages();
        assert_eq!(messages[1], "Status: ACTIVE");
        assert_eq!(messages[3], "Last Punch Out: Never");
        assert!(h.log.entries().iter().all(|e| e.kind == EntryKind::Null));
    }

    #[test]
    fn help_lists_every_command() {
        let mut h = harness();
        run(&mut h, CommandKeyword::Help, "help", Moment::now());
        assert_eq!(h.log.entries().len(), CommandKeyword::ALL.len());
    }

    #[test]
    fn end_marks_session_finished() {
        let mut h = harness();
        run(&mut h, CommandKeyword::End, "end", Moment::now());
        assert!(h.ctx.session.is_finished());
        assert_eq!(h.ctx.session.status(), SessionStatus::Inactive);
        assert_eq!(last_message(&h), "End of Time Logging Session!");
    }
}
