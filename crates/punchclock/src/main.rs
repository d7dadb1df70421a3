//! punchclock - command-driven time tracking
//!
//! Wires together:
//! - Configuration loading
//! - Alias store (sqlite) and time log (plain text, echoed to the terminal)
//! - Process control (Linux)
//! - The command dispatcher, fed from stdin or a single command line

mod console;

use anyhow::{Context, Result};
use clap::Parser;
use punch_config::{load_config, load_config_or_default, Settings};
use punch_core::{
    AliasStore, CommandDispatcher, CommandInput, CommandRegistry, SessionContext,
};
use punch_host_api::ProcessControl;
use punch_host_linux::LinuxProcessControl;
use punch_store::{AliasNamespaceStore, FileTimeLog, SqliteStore, TimeLog};
use punch_util::{default_config_path, Moment, PUNCHCLOCK_CONFIG_ENV, PUNCHCLOCK_DATA_DIR_ENV};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleTimeLog;

/// punchclock - punch in, rest, resume and punch out from the terminal
#[derive(Parser, Debug)]
#[command(name = "punchclock")]
#[command(about = "Command-driven time tracking sessions", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/punchclock/config.toml)
    #[arg(short, long, env = PUNCHCLOCK_CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Data directory override (or set PUNCHCLOCK_DATA_DIR env var)
    #[arg(short, long, env = PUNCHCLOCK_DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Log level for diagnostics on stderr
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Run a single command and exit, e.g. `punchclock -- post "hello"`
    #[arg(last = true)]
    command: Vec<String>,
}

/// Load settings; an explicitly named file must exist, the default one may not
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => {
            let path = default_config_path();
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
    };

    if let Some(data_dir) = &args.data_dir {
        settings.session.data_dir = data_dir.clone();
    }
    Ok(settings)
}

fn build_dispatcher(settings: &Settings) -> Result<CommandDispatcher> {
    let session = &settings.session;

    std::fs::create_dir_all(&session.data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", session.data_dir))?;

    let db_path = session.data_dir.join("punchclock.db");
    let store: Arc<dyn AliasNamespaceStore> = Arc::new(
        SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?,
    );
    info!(db_path = %db_path.display(), "Alias store opened");

    let file_log = FileTimeLog::new(&session.log_dir, punch_util::now())
        .with_context(|| format!("Failed to open time log in {:?}", session.log_dir))?;
    let log: Arc<dyn TimeLog> = Arc::new(ConsoleTimeLog::new(Arc::new(file_log)));

    let aliases = AliasStore::new(
        store,
        session.alias_namespace.clone(),
        session.account.clone(),
        session.alias_match,
    );
    match aliases.seed(&settings.aliases) {
        Ok(0) => {}
        Ok(written) => info!(written, "Seeded aliases from config"),
        Err(e) => warn!(error = %e, "Failed to seed aliases from config"),
    }

    let host: Arc<dyn ProcessControl> = Arc::new(LinuxProcessControl::new());
    let context = SessionContext::new(aliases, host, log, session.system_events);

    Ok(CommandDispatcher::new(CommandRegistry::standard(), context))
}

/// Key of an `alt+<key>` line, which triggers the command bound with HOTKEY
fn hotkey_request(line: &str) -> Option<char> {
    let line = line.trim();
    let rest = line.get(..4)?.eq_ignore_ascii_case("alt+").then(|| &line[4..])?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(key), None) => Some(key),
        _ => None,
    }
}

fn handle_line(dispatcher: &mut CommandDispatcher, line: &str) {
    let input = match hotkey_request(line) {
        Some(key) => match dispatcher.hotkey(key) {
            Some(command) => CommandInput::parse(command.keyword()),
            None => {
                debug!(%key, "No command bound to hotkey");
                return;
            }
        },
        None => CommandInput::parse(line),
    };

    let fired = dispatcher.dispatch(&input, Moment::now());
    debug!(?fired, "Command handled");
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn run_interactive(mut dispatcher: CommandDispatcher) -> Result<()> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    dispatcher.context().announce();
    prompt();

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, ending session");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, ending session");
                break;
            }
            line = lines.next_line() => {
                match line.context("Failed to read from stdin")? {
                    Some(line) => {
                        handle_line(&mut dispatcher, &line);
                        if dispatcher.is_finished() {
                            return Ok(());
                        }
                        prompt();
                    }
                    None => {
                        debug!("stdin closed");
                        break;
                    }
                }
            }
        }
    }

    if !dispatcher.is_finished() {
        dispatcher.dispatch(&CommandInput::parse("end"), Moment::now());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stderr so they never mix with the time log echo
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "punchclock starting");
    if punch_util::is_mock_time_active() {
        warn!("Mock time is active, time log timestamps are not real");
    }

    let settings = load_settings(&args)?;
    let mut dispatcher = build_dispatcher(&settings)?;

    if !args.command.is_empty() {
        let input = CommandInput::from_args(args.command.clone());
        let fired = dispatcher.dispatch(&input, Moment::now());
        if fired.is_empty() {
            warn!(command = %input.raw, "Command matched nothing");
        }
        return Ok(());
    }

    run_interactive(dispatcher).await
}
