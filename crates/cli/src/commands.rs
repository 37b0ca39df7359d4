//! Clap command tree shared by shell, REPL and pipe modes.

use clap::{Arg, ArgAction, Command};

/// Top-level `roster` command with global flags.
pub fn build_cli() -> Command {
    with_subcommands(
        Command::new("roster")
            .about("Versioned records with optimistic partial updates")
            .version(env!("CARGO_PKG_VERSION"))
            .arg(
                Arg::new("db")
                    .long("db")
                    .value_name("DIR")
                    .help("Database directory")
                    .default_value(".roster")
                    .global(true),
            )
            .arg(
                Arg::new("ephemeral")
                    .long("ephemeral")
                    .help("In-memory database, nothing written to disk")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .arg(
                Arg::new("durability")
                    .long("durability")
                    .value_name("MODE")
                    .help("WAL sync policy")
                    .value_parser(["none", "strict", "batched"])
                    .default_value("batched")
                    .global(true),
            )
            .arg(
                Arg::new("json")
                    .long("json")
                    .help("Print results and errors as JSON")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .arg(
                Arg::new("table")
                    .long("table")
                    .value_name("NAME")
                    .help("Record table")
                    .default_value(roster::POSTS_TABLE)
                    .global(true),
            ),
    )
}

/// Command tree for one REPL or pipe line (no binary name, no global flags).
pub fn build_line_cli() -> Command {
    with_subcommands(
        Command::new("roster")
            .no_binary_name(true)
            .disable_version_flag(true)
            .subcommand_required(true),
    )
}

fn with_subcommands(cmd: Command) -> Command {
    cmd.subcommand(
        Command::new("create")
            .about("Create a record at version 1")
            .arg(Arg::new("id").required(true))
            .arg(Arg::new("fields").help("JSON object of initial fields")),
    )
    .subcommand(
        Command::new("get")
            .about("Read a record")
            .arg(Arg::new("id").required(true)),
    )
    .subcommand(
        Command::new("update")
            .about("Apply a conditional partial update")
            .long_about(
                "Apply a conditional partial update.\n\n\
                 REQUEST is a JSON object with \"id\" and \"expectedVersion\"; every \
                 other key sets a field, null removes it.",
            )
            .arg(Arg::new("request").required(true).value_name("REQUEST")),
    )
    .subcommand(
        Command::new("delete")
            .about("Delete a record")
            .arg(Arg::new("id").required(true))
            .arg(
                Arg::new("expect")
                    .long("expect")
                    .value_name("VERSION")
                    .help("Only delete if the record is at this version"),
            ),
    )
    .subcommand(Command::new("list").about("List all records of the table"))
    .subcommand(
        Command::new("login")
            .about("Login history")
            .subcommand_required(true)
            .subcommand(
                Command::new("record")
                    .about("Record a login now")
                    .arg(Arg::new("uid").required(true)),
            )
            .subcommand(
                Command::new("recent")
                    .about("Most recent logins, newest first")
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_name("N")
                            .default_value("5"),
                    )
                    .arg(
                        Arg::new("uid")
                            .long("uid")
                            .value_name("UID")
                            .help("Only logins of this user"),
                    ),
            ),
    )
}
