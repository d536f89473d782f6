//! Terminal surface
//!
//! Provides human-readable display for the chat session and the interactive
//! prompts (line input, yes/no approval) the interrupt resolver relies on.

pub mod display;
pub mod prompt;

pub use display::ChatDisplay;
pub use prompt::{is_exit_command, read_user_line, Approver, TerminalApprover};
