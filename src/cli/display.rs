//! Rich CLI display for the chat session
//!
//! Renders stream-json events and interrupt notices as human-readable
//! terminal output. Agent responses go to stdout; operational status
//! (model info, tool activity, authorization notices, errors) goes to
//! stderr so transcripts can be piped cleanly.

use colored::Colorize;
use serde_json::Value;

use crate::agent::stream::AgentEvent;

/// Display handler for the chat session.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatDisplay;

impl ChatDisplay {
    /// Create a new display handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Print the session greeting.
    pub fn greeting(self) {
        println!(
            "{}",
            "Welcome to the chatbot! Type 'exit' to quit.".green().bold()
        );
    }

    /// Print the session farewell.
    pub fn goodbye(self) {
        println!("{}", "Bye...".red());
    }

    /// Render a stream event.
    pub fn render_event(self, event: &AgentEvent) {
        match event {
            AgentEvent::SystemInit { model, .. } => {
                eprintln!("  {} {}", "Model:".dimmed(), model);
            }
            AgentEvent::AssistantText { text } => {
                println!("{} {text}", "agent:".cyan().bold());
            }
            AgentEvent::ToolUse { tool_name, input } => {
                let summary = summarize_tool_input(tool_name, input);
                eprintln!("  {} {}{}", "▶".blue(), tool_name.bold(), summary.dimmed());
            }
            AgentEvent::Result {
                is_error: true,
                result_text,
            } => {
                eprintln!("  {} {}", "✗".red().bold(), truncate(result_text, 200).red());
            }
            AgentEvent::Result {
                is_error: false,
                result_text,
            } => {
                if !result_text.is_empty() {
                    println!("{} {result_text}", "agent:".cyan().bold());
                }
            }
            // Interrupts are collected, not rendered; unknown events are skipped
            AgentEvent::Interrupted { .. } | AgentEvent::Unknown { .. } => {}
        }
    }

    /// Announce that a tool call is waiting on an out-of-band grant.
    pub fn auth_required(self, tool_name: &str, auth_url: &str) {
        eprintln!(
            "{} Authorization required for tool call {}",
            "⚙".yellow(),
            tool_name.bold()
        );
        eprintln!(
            "{} Please authorize in your browser: {}",
            "⚙".yellow(),
            auth_url.underline()
        );
        eprintln!(
            "{} Waiting for you to complete authorization...",
            "⚙".yellow()
        );
    }

    /// Report a completed authorization grant.
    pub fn auth_granted(self) {
        eprintln!(
            "{} Authorization granted. Resuming execution...",
            "⚙".green()
        );
    }

    /// Report a failed authorization wait. The tool call will be refused.
    pub fn auth_failed(self, err: &anyhow::Error) {
        eprintln!(
            "{} Error waiting for authorization to complete: {err:#}",
            "✗".red().bold()
        );
    }

    /// Announce a tool call that needs interactive approval.
    pub fn approval_required(self, tool_name: &str, input: &Value) {
        eprintln!(
            "{} Human in the loop required for tool call {}",
            "⚙".yellow(),
            tool_name.bold()
        );
        eprintln!("{} Proposed input: {input}", "⚙".yellow());
    }

    /// Warn that an interrupt matched no known shape and was refused.
    pub fn unrecognized_interrupt(self) {
        eprintln!(
            "  {} Unrecognized interrupt; refusing the suspended tool call",
            "⚠".yellow().bold()
        );
    }

    /// Report a failed turn. The session continues with the next prompt.
    pub fn turn_failed(self, err: &anyhow::Error) {
        eprintln!("{} Turn failed: {err:#}", "✗".red().bold());
    }

    /// Report a transcript write failure without interrupting the session.
    pub fn transcript_failed(self, err: &anyhow::Error) {
        eprintln!("  {} Could not write transcript: {err:#}", "⚠".yellow());
    }
}

/// Summarize tool input as a short one-line string.
///
/// Matches on the operation suffix so both bare and toolkit-prefixed names
/// (`WriteToCell` / `GoogleSheets_WriteToCell`) summarize the same way.
fn summarize_tool_input(tool_name: &str, input: &Value) -> String {
    let operation = tool_name.rsplit('_').next().unwrap_or(tool_name);
    match operation {
        "WriteToCell" | "AddNoteToCell" => {
            let column = input.get("column").and_then(Value::as_str);
            let row = input.get("row").and_then(Value::as_u64);
            match (column, row) {
                (Some(column), Some(row)) => format!(" {column}{row}"),
                _ => String::new(),
            }
        }
        "GetSpreadsheet" | "GetSpreadsheetMetadata" | "UpdateCells" => input
            .get("spreadsheet_id")
            .and_then(Value::as_str)
            .map_or_else(String::new, |id| format!(" {id}")),
        "CreateSpreadsheet" => input
            .get("title")
            .and_then(Value::as_str)
            .map_or_else(String::new, |t| format!(" \"{t}\"")),
        "SearchSpreadsheets" => input
            .get("spreadsheet_contains")
            .and_then(Value::as_array)
            .map_or_else(String::new, |keywords| {
                let joined = keywords
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(" \"{joined}\"")
            }),
        _ => String::new(),
    }
}

/// Truncate text for single-line display.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
