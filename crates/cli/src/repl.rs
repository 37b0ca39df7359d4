//! Interactive REPL and line-by-line pipe mode.

use std::io::{self, BufRead};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::commands::build_line_cli;
use crate::format::{format_error, format_output, OutputMode};
use crate::parse::{parse_line, CliAction, MetaCommand};
use crate::state::SessionState;

const HISTORY_FILE: &str = ".roster_history";

/// What the caller should do after one line.
enum LineOutcome {
    Continue { ok: bool },
    Quit,
}

/// Run the interactive prompt until `quit` or end of input.
pub fn run_repl(state: &mut SessionState, mode: OutputMode) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("(error) Failed to start line editor: {}", e);
            return;
        }
    };
    let _ = editor.load_history(HISTORY_FILE);

    loop {
        let prompt = format!("roster:{}> ", state.table());
        match editor.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                if let LineOutcome::Quit = execute_line(state, &line, mode) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("(error) {}", e);
                break;
            }
        }
    }

    let _ = editor.save_history(HISTORY_FILE);
}

/// Execute stdin line by line. Returns 1 if any line failed.
pub fn run_pipe(state: &mut SessionState, mode: OutputMode) -> i32 {
    let mut exit_code = 0;
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("(error) {}", e);
                return 1;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match execute_line(state, trimmed, mode) {
            LineOutcome::Continue { ok: true } => {}
            LineOutcome::Continue { ok: false } => exit_code = 1,
            LineOutcome::Quit => break,
        }
    }
    exit_code
}

fn execute_line(state: &mut SessionState, line: &str, mode: OutputMode) -> LineOutcome {
    let ok = match parse_line(line) {
        Ok(CliAction::Execute(request)) => match state.execute(request) {
            Ok(output) => {
                println!("{}", format_output(&output, mode));
                true
            }
            Err(e) => {
                eprintln!("{}", format_error(&e, mode));
                false
            }
        },
        Ok(CliAction::Meta(meta)) => return run_meta(state, meta),
        Err(e) => {
            eprintln!("(error) {}", e);
            false
        }
    };
    LineOutcome::Continue { ok }
}

fn run_meta(state: &mut SessionState, meta: MetaCommand) -> LineOutcome {
    match meta {
        MetaCommand::Quit => LineOutcome::Quit,
        MetaCommand::Help => {
            let _ = build_line_cli().print_help();
            println!("\nREPL commands: use <table>, help, quit");
            LineOutcome::Continue { ok: true }
        }
        MetaCommand::Use { table } => match state.use_table(&table) {
            Ok(()) => {
                println!("OK");
                LineOutcome::Continue { ok: true }
            }
            Err(e) => {
                eprintln!("(error) {}", e);
                LineOutcome::Continue { ok: false }
            }
        },
    }
}
