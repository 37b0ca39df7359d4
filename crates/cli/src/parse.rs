//! ArgMatches → Request/MetaCommand conversion.
//!
//! Translates clap's parsed arguments into the appropriate action:
//! - Record and login commands → `CliAction::Execute(Request)`
//! - REPL meta-commands → `CliAction::Meta`

use clap::ArgMatches;

use crate::commands::build_line_cli;

/// The result of parsing user input.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// A command to run against the session's database.
    Execute(Request),
    /// A REPL-only meta-command.
    Meta(MetaCommand),
}

/// Database commands.
#[derive(Debug, PartialEq)]
pub enum Request {
    Create { id: String, fields: Option<String> },
    Get { id: String },
    Update { request: String },
    Delete { id: String, expect: Option<u64> },
    List,
    LoginRecord { uid: String },
    LoginRecent { limit: usize, uid: Option<String> },
}

/// REPL meta-commands.
#[derive(Debug, PartialEq)]
pub enum MetaCommand {
    Use { table: String },
    Help,
    Quit,
}

/// Check for REPL meta-commands before delegating to clap.
///
/// Returns `Some(MetaCommand)` if the line is a meta-command, `None` otherwise.
pub fn check_meta_command(line: &str) -> Option<MetaCommand> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "quit" | "exit" => Some(MetaCommand::Quit),
        "help" => Some(MetaCommand::Help),
        "use" => {
            let table = parts.next()?.to_string();
            Some(MetaCommand::Use { table })
        }
        _ => None,
    }
}

/// Parse one REPL or pipe line: meta-commands first, then the command tree.
pub fn parse_line(line: &str) -> Result<CliAction, String> {
    if let Some(meta) = check_meta_command(line) {
        return Ok(CliAction::Meta(meta));
    }
    let words = shlex::split(line).ok_or("Unbalanced quotes")?;
    let matches = build_line_cli()
        .try_get_matches_from(words)
        .map_err(|e| e.to_string().trim_end().trim_start_matches("error: ").to_string())?;
    matches_to_action(&matches)
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    let request = match sub_name {
        "create" => Request::Create {
            id: required(m, "id")?,
            fields: m.get_one::<String>("fields").cloned(),
        },
        "get" => Request::Get {
            id: required(m, "id")?,
        },
        "update" => Request::Update {
            request: required(m, "request")?,
        },
        "delete" => Request::Delete {
            id: required(m, "id")?,
            expect: m
                .get_one::<String>("expect")
                .map(|s| s.parse::<u64>())
                .transpose()
                .map_err(|e| format!("Invalid version: {}", e))?,
        },
        "list" => Request::List,
        "login" => parse_login(m)?,
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(CliAction::Execute(request))
}

fn parse_login(matches: &ArgMatches) -> Result<Request, String> {
    let (sub, m) = matches.subcommand().ok_or("No login subcommand")?;
    match sub {
        "record" => Ok(Request::LoginRecord {
            uid: required(m, "uid")?,
        }),
        "recent" => {
            let limit = m
                .get_one::<String>("limit")
                .map(|s| s.parse::<usize>())
                .transpose()
                .map_err(|e| format!("Invalid limit: {}", e))?
                .unwrap_or(roster::DEFAULT_RECENT_LIMIT);
            Ok(Request::LoginRecent {
                limit,
                uid: m.get_one::<String>("uid").cloned(),
            })
        }
        other => Err(format!("Unknown login subcommand: {}", other)),
    }
}

fn required(matches: &ArgMatches, name: &str) -> Result<String, String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", name))
}
