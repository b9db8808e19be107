//! Terminal rendering of listings and diffs.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;

use walkdump_reader::{SessionStart, PRODUCER_NAME};

/// One line per dump, in file order. JSON output is one object per line.
pub fn print_sessions<W: Write>(out: &mut W, sessions: &[SessionStart], json: bool) -> Result<()> {
    for session in sessions {
        if json {
            writeln!(out, "{}", serde_json::to_string(session)?)?;
        } else {
            writeln!(out, "Found {} dump at {}", PRODUCER_NAME, session.timestamp)?;
        }
    }
    Ok(())
}

/// Print a unified diff, colored when the terminal supports it.
pub fn print_diff<W: Write>(out: &mut W, diff: &str) -> Result<()> {
    for (idx, line) in diff.lines().enumerate() {
        let styled = if idx < 2 && (line.starts_with("---") || line.starts_with("+++")) {
            line.bold()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        writeln!(out, "{}", styled)?;
    }
    Ok(())
}
