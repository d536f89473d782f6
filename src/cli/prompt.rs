//! Interactive terminal input
//!
//! Wraps line input and yes/no confirmation behind small seams so the
//! session loop and interrupt resolver can be driven by fakes in tests.

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

/// Asks the user a yes/no question. The answer becomes a resume decision.
pub trait Approver {
    /// Ask `question` and return the user's answer.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Production approver backed by an interactive terminal prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalApprover;

impl Approver for TerminalApprover {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}

/// Read one line of user input from the terminal.
///
/// Returns an error on EOF or a closed terminal; the caller treats that the
/// same as the exit keyword.
pub fn read_user_line() -> Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(">")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read user input")
}

/// Whether `input` is the session exit keyword.
///
/// The literal word `exit`, ASCII case-insensitive, as the sole input ends
/// the session without invoking the agent.
#[must_use]
pub fn is_exit_command(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("exit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_lowercase() {
        assert!(is_exit_command("exit"));
    }

    #[test]
    fn test_exit_any_letter_case() {
        assert!(is_exit_command("EXIT"));
        assert!(is_exit_command("Exit"));
        assert!(is_exit_command("eXiT"));
    }

    #[test]
    fn test_exit_with_surrounding_whitespace() {
        assert!(is_exit_command("  exit  "));
        assert!(is_exit_command("exit\n"));
    }

    #[test]
    fn test_non_exit_input() {
        assert!(!is_exit_command("quit"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("please exit"));
        assert!(!is_exit_command(""));
    }
}
