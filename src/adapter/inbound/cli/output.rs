//! CLI output formatting.
//!
//! Human-readable lines by default. With `--json` every line becomes a
//! `{"type", "payload"}` object so output stays scriptable; `--quiet`
//! suppresses everything except warnings, errors and results.

use std::fmt::Display;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{json, Value};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::domain::health::Health;

/// Output flags shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT: RwLock<OutputConfig> = parking_lot::const_rwlock(OutputConfig::new(false, false));

fn current() -> OutputConfig {
    *OUTPUT.read()
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *OUTPUT.write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

fn json_line(kind: &str, payload: Value) -> String {
    json!({ "type": kind, "payload": payload }).to_string()
}

/// Print one stdout line: `payload` in JSON mode, `text` otherwise.
/// `text` is dropped under `--quiet` unless `always` is set.
fn emit(kind: &str, payload: Value, always: bool, text: impl FnOnce() -> String) {
    let config = current();
    if config.json {
        println!("{}", json_line(kind, payload));
    } else if always || !config.quiet {
        println!("{}", text());
    }
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit("field", json!({ "label": label, "value": value }), false, || {
        format!("  {:<14} {}", label.dimmed(), value)
    });
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), false, || {
        format!("  {} {}", "✓".green(), message)
    });
}

pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), true, || {
        format!("  {} {}", "⚠".yellow(), message)
    });
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json_line("error", json!({ "message": message })));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), false, || format!("\n{}", title.bold()));
}

pub fn note(message: &str) {
    emit("note", json!({ "message": message }), false, || format!("  {}", message.dimmed()));
}

/// Emit a command result.
///
/// JSON mode prints it as one `{"type", "payload"}` line; text mode
/// pretty-prints it. Results are shown even with `--quiet`.
pub fn result(kind: &str, payload: &impl Serialize) {
    let value = serde_json::to_value(payload).unwrap_or(Value::Null);
    if is_json() {
        println!("{}", json_line(kind, value));
        return;
    }
    match serde_json::to_string_pretty(&value) {
        Ok(text) => {
            for line in text.lines() {
                println!("  {line}");
            }
        }
        Err(_) => println!("  {value}"),
    }
}

/// Print rows as a rounded table. Skipped in JSON and quiet mode.
pub fn table<T: Tabled>(rows: impl IntoIterator<Item = T>) {
    let config = current();
    if config.json || config.quiet {
        return;
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    for line in table.to_string().lines() {
        println!("  {line}");
    }
}

/// A health bucket, colored by severity.
#[must_use]
pub fn health(bucket: Health) -> String {
    let label = bucket.as_str();
    if is_json() {
        return label.to_string();
    }
    match bucket {
        Health::Critical => format!("{}", label.red()),
        Health::Warning => format!("{}", label.yellow()),
        Health::Healthy => format!("{}", label.green()),
    }
}

#[must_use]
pub fn highlight(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.cyan())
}

#[must_use]
pub fn muted(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.dimmed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lines_carry_type_and_payload() {
        let line: Value = serde_json::from_str(&json_line("field", json!({"label": "url"}))).unwrap();
        assert_eq!(line["type"], "field");
        assert_eq!(line["payload"]["label"], "url");
    }
}
