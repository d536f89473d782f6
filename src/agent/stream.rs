//! Stream-JSON parser for the agent bridge's `--output-format stream-json` output
//!
//! Parses newline-delimited JSON events from the agent bridge into structured
//! `AgentEvent` variants for display and interrupt collection.

use serde_json::Value;

use super::interrupt::Interrupt;

/// A parsed event from the agent bridge's stream-json output
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// System initialization with session metadata
    SystemInit {
        /// The model being used
        model: String,
        /// Session ID echoed back by the runtime
        session_id: String,
    },
    /// Assistant text output
    AssistantText {
        /// The text content
        text: String,
    },
    /// Tool use announced by the assistant
    ToolUse {
        /// Tool name (e.g., "GoogleSheets_WriteToCell")
        tool_name: String,
        /// Tool input as raw JSON
        input: Value,
    },
    /// Suspension signal carrying one or more interrupts.
    ///
    /// Never rendered as normal output; the session loop collects these and
    /// resumes the agent once every interrupt has a decision.
    Interrupted {
        /// Interrupts in the order the runtime emitted them
        interrupts: Vec<Interrupt>,
    },
    /// Final event of one streaming round
    Result {
        /// Whether the round ended in an error
        is_error: bool,
        /// Human-readable result text
        result_text: String,
    },
    /// Unrecognized event type
    Unknown {
        /// The raw event type string
        event_type: String,
    },
}

/// Parse a single line of stream-json output into an `AgentEvent`.
///
/// Returns `None` if the line is empty or not valid JSON.
#[must_use]
pub fn parse_event(line: &str) -> Option<AgentEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let value: Value = serde_json::from_str(line).ok()?;
    let event_type = value.get("type")?.as_str()?;

    match event_type {
        "system" => Some(parse_system_event(&value)),
        "assistant" => parse_assistant_event(&value),
        "interrupt" => Some(parse_interrupt_event(&value)),
        "result" => Some(parse_result_event(&value)),
        other => Some(AgentEvent::Unknown {
            event_type: other.to_string(),
        }),
    }
}

fn parse_system_event(value: &Value) -> AgentEvent {
    let model = value
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let session_id = value
        .get("session_id")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    AgentEvent::SystemInit { model, session_id }
}

fn parse_assistant_event(value: &Value) -> Option<AgentEvent> {
    let message = value.get("message")?;
    let content = message.get("content")?.as_array()?;

    // Extract first meaningful content block
    for block in content {
        let block_type = block.get("type")?.as_str()?;
        match block_type {
            "text" => {
                let text = block.get("text")?.as_str()?.to_string();
                return Some(AgentEvent::AssistantText { text });
            }
            "tool_use" => {
                let tool_name = block
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                let input = block.get("input").cloned().unwrap_or(Value::Null);
                return Some(AgentEvent::ToolUse { tool_name, input });
            }
            _ => {}
        }
    }

    None
}

fn parse_interrupt_event(value: &Value) -> AgentEvent {
    let interrupts = value
        .get("interrupts")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().map(Interrupt::from_value).collect())
        .unwrap_or_default();

    AgentEvent::Interrupted { interrupts }
}

fn parse_result_event(value: &Value) -> AgentEvent {
    let is_error = value
        .get("is_error")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let result_text = value
        .get("result")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    AgentEvent::Result {
        is_error,
        result_text,
    }
}
