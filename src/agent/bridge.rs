//! Agent bridge command builder and stream consumer
//!
//! Constructs `std::process::Command` for invoking the agent bridge — the
//! external process that talks to the hosted LLM runtime and the tool
//! platform — and consumes its stream-json output one turn at a time.
//! Interrupts are collected in arrival order and handed back to the session
//! loop for resolution.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::process::Command;
use tokio::io::AsyncBufReadExt;
use tokio::process::Command as TokioCommand;

use super::interrupt::{resume_payload, Decision, Interrupt};
use super::stream::{parse_event, AgentEvent};
use crate::chat::config::{ChatConfig, EnvConfig};
use crate::cli::display::ChatDisplay;

/// Input for one streaming round: a fresh user turn, or the decisions that
/// resume a suspended one.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnInput {
    /// A user message starting a new round
    Message(String),
    /// Ordered decisions resuming the round that last suspended
    Resume(Vec<Decision>),
}

/// Outcome of one streaming round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnRound {
    /// Interrupts collected during the round, in arrival order.
    /// Empty means the agent completed without suspending.
    pub interrupts: Vec<Interrupt>,
    /// Final result text, if the round reached a `result` event
    pub result_text: Option<String>,
    /// Whether the `result` event reported an error
    pub is_error: bool,
}

/// The seam between the session loop and the external agent runtime.
#[async_trait]
pub trait AgentRuntime {
    /// Drive one streaming round for the given input and session.
    async fn run_turn(&mut self, input: &TurnInput, session_id: &str) -> Result<TurnRound>;
}

/// Build a `Command` to invoke the agent bridge for one streaming round.
///
/// The command carries the authorizing user, model, session id and agent
/// configuration, plus `--output-format stream-json` for structured
/// streaming output. The turn input maps to `-p <text>` for a user message
/// or `--resume <json>` for a decision batch.
pub fn build_command(
    input: &TurnInput,
    session_id: &str,
    env: &EnvConfig,
    config: &ChatConfig,
) -> Result<Command> {
    let mut cmd = Command::new(&config.agent.binary);

    cmd.arg("--user").arg(&env.user_id);
    cmd.arg("--model").arg(&env.model);
    cmd.arg("--session").arg(session_id);
    cmd.arg("--output-format").arg("stream-json");

    for toolkit in &config.agent.toolkits {
        cmd.arg("--toolkit").arg(toolkit);
    }
    cmd.arg("--tool-limit")
        .arg(config.agent.tool_limit.to_string());
    cmd.arg("--system-prompt").arg(&config.agent.system_prompt);

    for tool in &config.approval.confirm_tools {
        cmd.arg("--confirm-tool").arg(tool);
    }

    match input {
        TurnInput::Message(text) => {
            cmd.arg("-p").arg(text);
        }
        TurnInput::Resume(decisions) => {
            let payload =
                resume_payload(decisions).context("Failed to serialize resume decisions")?;
            cmd.arg("--resume").arg(payload);
        }
    }

    Ok(cmd)
}

/// Spawn a bridge command and consume its stream-json output.
///
/// Renders every non-interrupt event through the display as it arrives,
/// accumulates interrupts without treating them as output, and stops at the
/// round's `result` event. A stream that ends with neither interrupts nor a
/// result and a failing exit status is reported as a turn error.
pub async fn run_turn(cmd: Command, display: &ChatDisplay) -> Result<TurnRound> {
    let mut child = TokioCommand::from(cmd)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::null())
        .spawn()
        .context("Failed to spawn agent bridge")?;

    let stdout = child.stdout.take().context("No stdout from agent bridge")?;
    let reader = tokio::io::BufReader::new(stdout);
    let mut lines = reader.lines();
    let mut round = TurnRound::default();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read agent bridge output")?
    {
        let Some(event) = parse_event(&line) else {
            continue;
        };
        match event {
            AgentEvent::Interrupted { interrupts } => {
                round.interrupts.extend(interrupts);
            }
            AgentEvent::Result {
                is_error,
                ref result_text,
            } => {
                round.result_text = Some(result_text.clone());
                round.is_error = is_error;
                display.render_event(&event);
                break;
            }
            other => display.render_event(&other),
        }
    }

    let status = child.wait().await.context("Failed waiting for bridge")?;

    if !status.success() && round.interrupts.is_empty() && round.result_text.is_none() {
        bail!(
            "Agent bridge exited with {} before producing a result",
            status
                .code()
                .map_or_else(|| "signal".to_string(), |c| format!("code {c}"))
        );
    }

    Ok(round)
}

/// Production runtime: every round is one invocation of the agent bridge.
pub struct BridgeRuntime {
    env: EnvConfig,
    config: ChatConfig,
    display: ChatDisplay,
}

impl BridgeRuntime {
    /// Create a runtime from validated environment and agent configuration.
    #[must_use]
    pub const fn new(env: EnvConfig, config: ChatConfig, display: ChatDisplay) -> Self {
        Self {
            env,
            config,
            display,
        }
    }
}

#[async_trait]
impl AgentRuntime for BridgeRuntime {
    async fn run_turn(&mut self, input: &TurnInput, session_id: &str) -> Result<TurnRound> {
        let cmd = build_command(input, session_id, &self.env, &self.config)?;
        run_turn(cmd, &self.display).await
    }
}
