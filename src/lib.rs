//! Sheetchat - Terminal chatbot for a hosted Google Sheets agent
//!
//! Sheetchat forwards user messages to a hosted LLM agent with access to
//! Google Sheets tools. When a tool call needs an out-of-band authorization
//! grant or interactive approval, the agent suspends; the session resolves
//! every interrupt into an ordered decision batch and resumes the agent.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod agent;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod log;

// Re-export commonly used types
pub use agent::bridge::{build_command, AgentRuntime, BridgeRuntime, TurnInput, TurnRound};
pub use agent::interrupt::{resume_payload, Decision, Interrupt};
pub use agent::stream::{parse_event, AgentEvent};
pub use auth::{AuthWaiter, CliAuthWaiter};
pub use chat::config::{ChatConfig, EnvConfig};
pub use chat::resolver::resolve_interrupts;
pub use chat::session::{Session, SessionContext, TurnReport};
pub use cli::{is_exit_command, ChatDisplay, TerminalApprover};
pub use log::{TranscriptLogger, TurnRecord};
