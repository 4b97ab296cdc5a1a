//! Shared helper functions for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Bold title followed by a rule of the same width
pub fn print_heading(title: &str) {
    println!("{}", style(title).bold());
    println!("{}", "=".repeat(title.chars().count().max(50)));
}

/// `count noun(s)` with the count highlighted
pub fn counted(count: usize, noun: &str) -> String {
    format!("{} {}(s)", style(count).cyan(), noun)
}
