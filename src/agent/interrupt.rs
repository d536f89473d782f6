//! Interrupt payloads and resume decisions
//!
//! An interrupt is a suspension signal emitted by the agent runtime when a
//! tool call needs out-of-band input before it can proceed. Payloads are
//! classified into a tagged union here so the rest of the crate never probes
//! loose JSON fields.

use serde::Serialize;
use serde_json::Value;

/// A classified interrupt emitted by the agent runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Interrupt {
    /// The tool platform needs the user to complete an OAuth-style grant.
    AuthorizationRequired {
        /// Name of the tool awaiting authorization
        tool_name: String,
        /// URL the user must open to complete the grant
        auth_url: String,
        /// Authorization request id, used to poll for completion
        auth_id: String,
    },
    /// The tool call needs explicit yes/no approval from the user.
    ApprovalRequired {
        /// Name of the tool awaiting approval
        tool_name: String,
        /// Proposed tool input, shown to the user verbatim
        input: Value,
    },
    /// Payload matched neither known shape. Always resolves to "not authorized".
    Unrecognized {
        /// The raw payload, kept for display and transcript purposes
        raw: Value,
    },
}

impl Interrupt {
    /// Classify a raw interrupt payload.
    ///
    /// A payload with a truthy `authorization_required` flag must also carry
    /// an `authorization_response` object with `url` and `id`; otherwise it
    /// is malformed and falls through to `Unrecognized`.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let tool_name = value
            .get("tool_name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        if is_truthy(value.get("authorization_required")) {
            if let Some(response) = value.get("authorization_response") {
                let url = response.get("url").and_then(Value::as_str);
                let id = response.get("id").and_then(Value::as_str);
                if let (Some(url), Some(id)) = (url, id) {
                    return Self::AuthorizationRequired {
                        tool_name,
                        auth_url: url.to_string(),
                        auth_id: id.to_string(),
                    };
                }
            }
            return Self::Unrecognized { raw: value.clone() };
        }

        if is_truthy(value.get("hitl_required")) {
            let input = value.get("input").cloned().unwrap_or(Value::Null);
            return Self::ApprovalRequired { tool_name, input };
        }

        Self::Unrecognized { raw: value.clone() }
    }

    /// The tool name this interrupt refers to, if the payload carried one.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            Self::AuthorizationRequired { tool_name, .. }
            | Self::ApprovalRequired { tool_name, .. } => Some(tool_name),
            Self::Unrecognized { .. } => None,
        }
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    value.is_some_and(|v| v.as_bool() == Some(true))
}

/// The resume decision for a single interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether the suspended tool call may proceed
    pub authorized: bool,
}

impl Decision {
    /// Decision that lets the tool call proceed.
    pub const ALLOW: Self = Self { authorized: true };
    /// Decision that refuses the tool call.
    pub const DENY: Self = Self { authorized: false };
}

/// Serialize a batch of decisions into the resume payload.
///
/// The agent runtime expects a single decision as a bare object and several
/// decisions as an ordered array, matching the interrupts of the round by
/// position.
pub fn resume_payload(decisions: &[Decision]) -> anyhow::Result<String> {
    let json = if decisions.len() == 1 {
        serde_json::to_string(&decisions[0])?
    } else {
        serde_json::to_string(decisions)?
    };
    Ok(json)
}
