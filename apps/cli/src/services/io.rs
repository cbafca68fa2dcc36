use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// Reads a JSON document from `input`, or stdin for `None` / `-`.
///
/// # Errors
/// Returns an error if the source cannot be read or is not valid JSON.
pub fn read_json(input: Option<&Path>) -> Result<Value> {
    match input {
        Some(path) if path != Path::new("-") => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", path.display()))
        },
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
            serde_json::from_str(&text).context("stdin is not valid JSON")
        },
    }
}

/// Writes a JSON document followed by a newline to stdout.
///
/// # Errors
/// Returns an error if stdout is closed.
pub fn write_json(value: &Value, pretty: bool) -> Result<()> {
    let text = if pretty { serde_json::to_string_pretty(value)? } else { value.to_string() };
    write_line(&text)
}

/// # Errors
/// Returns an error if stdout is closed.
pub fn write_line(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").context("Failed to write to stdout")
}
