//! Output formatting for human and JSON modes.

use roster::{Error, LoginEntry, Record};
use roster_wire::{record_to_json, to_json};
use serde_json::{json, Value as Json};

use crate::state::Output;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format_human(output),
        OutputMode::Json => output_to_json(output).to_string(),
    }
}

pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format!("(error) {}", err),
        OutputMode::Json => err.to_json().to_string(),
    }
}

fn output_to_json(output: &Output) -> Json {
    match output {
        Output::Record(r) => record_to_json(r),
        Output::MaybeRecord(r) => r.as_ref().map_or(Json::Null, record_to_json),
        Output::Records(rs) => Json::Array(rs.iter().map(record_to_json).collect()),
        Output::Deleted(existed) => json!({ "deleted": existed }),
        Output::Login(e) => login_to_json(e),
        Output::Logins(es) => Json::Array(es.iter().map(login_to_json).collect()),
    }
}

fn login_to_json(entry: &LoginEntry) -> Json {
    json!({
        "id": entry.id.as_str(),
        "uid": entry.uid,
        "loginTime": entry.login_time,
    })
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Record(r) | Output::MaybeRecord(Some(r)) => human_record(r),
        Output::MaybeRecord(None) => "(nil)".to_string(),
        Output::Records(rs) if rs.is_empty() => "(empty list)".to_string(),
        Output::Records(rs) => rs
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}) {}", i + 1, human_record(r).replace('\n', "\n   ")))
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Deleted(existed) => format!("(integer) {}", u8::from(*existed)),
        Output::Login(e) => human_login(e),
        Output::Logins(es) if es.is_empty() => "(empty list)".to_string(),
        Output::Logins(es) => es
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}) {}", i + 1, human_login(e)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn human_record(record: &Record) -> String {
    let mut out = format!("{} (version {})", record.id, record.version);
    for (name, value) in &record.fields {
        out.push_str(&format!("\n  {}: {}", name, to_json(value)));
    }
    out
}

fn human_login(entry: &LoginEntry) -> String {
    match entry.login_time_utc() {
        Some(at) => format!("{} at {}", entry.uid, at.to_rfc3339()),
        None => format!("{} at {}", entry.uid, entry.login_time),
    }
}
