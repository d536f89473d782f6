//! Sheetchat - Terminal chatbot for a hosted Google Sheets agent
//!
//! CLI entry point for the chat session loop.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sheetchat::chat::config::{ChatConfig, EnvConfig};
use sheetchat::chat::session::{Session, SessionContext, TurnReport};
use sheetchat::cli::prompt::{is_exit_command, read_user_line, TerminalApprover};
use sheetchat::cli::ChatDisplay;
use sheetchat::log::{TranscriptLogger, TurnRecord};
use sheetchat::{BridgeRuntime, CliAuthWaiter};

/// Terminal chatbot for a hosted Google Sheets agent
///
/// Forwards user messages to the agent bridge, resolves tool authorization
/// and approval interrupts interactively, and logs a session transcript.
#[derive(Parser, Debug)]
#[command(name = "sheetchat", version, about)]
struct Cli {
    /// Path to the agent.toml configuration file
    #[arg(long, default_value = "agent.toml")]
    config: PathBuf,

    /// Directory for the session transcript (.sheetchat by default)
    #[arg(long, default_value = ".sheetchat")]
    log_dir: PathBuf,

    /// Session identifier (generated from the start time by default)
    #[arg(long)]
    session: Option<String>,
}

/// Build a `TurnRecord` from a completed turn for the transcript.
fn build_record(report: &TurnReport, turn: u32, session_id: &str, prompt: &str) -> TurnRecord {
    TurnRecord {
        turn,
        session_id: session_id.to_string(),
        timestamp: chrono::Utc::now(),
        prompt: prompt.to_string(),
        rounds: report.rounds,
        decisions: report.decisions.clone(),
        outcome: report.result_text.clone(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Required environment: who authorizes tools, and which model runs
    let env = EnvConfig::from_env().context("Refusing to start without required configuration")?;

    let config = ChatConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from '{}'", cli.config.display()))?;

    let logger =
        TranscriptLogger::new(&cli.log_dir).context("Failed to initialize transcript logger")?;

    let context = cli
        .session
        .as_deref()
        .map_or_else(SessionContext::new, SessionContext::with_id);

    let display = ChatDisplay::new();
    let waiter = CliAuthWaiter::new(&config.auth.binary);
    let runtime = BridgeRuntime::new(env, config, display);
    let mut session = Session::new(runtime, waiter, TerminalApprover, context, display);

    display.greeting();
    let mut turn: u32 = 1;

    loop {
        // EOF or a closed terminal ends the session like the exit keyword
        let Ok(line) = read_user_line() else {
            break;
        };
        if is_exit_command(&line) {
            break;
        }

        match session.run_turn(&line).await {
            Ok(report) => {
                let record = build_record(&report, turn, &session.context().id, &line);
                if let Err(err) = logger.append(&record) {
                    display.transcript_failed(&err);
                }
                turn += 1;
            }
            // A failed turn is logged and the loop continues to the next prompt
            Err(err) => display.turn_failed(&err),
        }
    }

    display.goodbye();
    Ok(())
}
