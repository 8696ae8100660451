//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_build_report, display_entry_point_missing, display_error, display_failure_hints,
    display_manual_push_instruction, display_status, display_success, display_sync_followup,
    display_sync_plan, display_warning,
};

/// Prompts for a username on stdin.
///
/// The answer is returned as typed (trimmed); validation happens in the sync
/// flow so an empty answer reaches it and is rejected there.
pub fn prompt_username() -> Result<String> {
    print!("\nEnter your GitHub username: ");
    io::stdout().flush()?;

    read_username(io::stdin().lock())
}

/// Reads one line from `input` as a username.
///
/// End of input counts as an empty answer.
pub fn read_username<R: BufRead>(mut input: R) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
