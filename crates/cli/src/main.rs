//! Roster CLI.
//!
//! Three modes:
//! - **Shell mode**: `roster [flags] COMMAND`: run one command and exit
//! - **REPL mode**: `roster [flags]`: interactive prompt when stdin is a TTY
//! - **Pipe mode**: `echo "get p1" | roster`: one command per stdin line

mod commands;
mod format;
mod parse;
mod repl;
mod state;

use std::io::IsTerminal;
use std::process;

use anyhow::Context;
use roster::{DurabilityMode, Roster};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_output, OutputMode};
use parse::{matches_to_action, CliAction};
use state::SessionState;

fn main() {
    init_logging();

    let cli = build_cli();
    let matches = cli.get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let mut state = match open_session(&matches) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("(error) {:#}", e);
            process::exit(1);
        }
    };

    let exit_code = if matches.subcommand().is_some() {
        run_shell_mode(&matches, &mut state, output_mode)
    } else if std::io::stdin().is_terminal() {
        repl::run_repl(&mut state, output_mode);
        0
    } else {
        repl::run_pipe(&mut state, output_mode)
    };

    if let Err(e) = state.close() {
        eprintln!("{}", format_error(&e, output_mode));
        process::exit(1);
    }
    process::exit(exit_code);
}

/// Log to stderr, filtered by `ROSTER_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("ROSTER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_session(matches: &clap::ArgMatches) -> anyhow::Result<SessionState> {
    let db = if matches.get_flag("ephemeral") {
        Roster::ephemeral().context("Failed to open ephemeral database")?
    } else {
        let path = matches
            .get_one::<String>("db")
            .map(|s| s.as_str())
            .unwrap_or(".roster");
        let mode: DurabilityMode = matches
            .get_one::<String>("durability")
            .map(|s| s.as_str())
            .unwrap_or("batched")
            .parse()
            .map_err(anyhow::Error::msg)?;
        Roster::builder()
            .path(path)
            .durability(mode)
            .open()
            .with_context(|| format!("Failed to open database at {}", path))?
    };

    debug!(path = ?db.path(), mode = ?db.durability_mode(), "database opened");

    let table = matches
        .get_one::<String>("table")
        .map(|s| s.as_str())
        .unwrap_or(roster::POSTS_TABLE);
    Ok(SessionState::new(db, table)?)
}

fn run_shell_mode(
    matches: &clap::ArgMatches,
    state: &mut SessionState,
    mode: OutputMode,
) -> i32 {
    match matches_to_action(matches) {
        Ok(CliAction::Execute(request)) => match state.execute(request) {
            Ok(output) => {
                println!("{}", format_output(&output, mode));
                0
            }
            Err(e) => {
                eprintln!("{}", format_error(&e, mode));
                1
            }
        },
        Ok(CliAction::Meta(_)) => {
            eprintln!("(error) Meta-commands are only available in REPL mode");
            1
        }
        Err(e) => {
            eprintln!("(error) {}", e);
            1
        }
    }
}
