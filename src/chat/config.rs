//! Chatbot configuration
//!
//! Two layers: required process environment (`ARCADE_USER_ID`, `OPENAI_MODEL`)
//! validated at startup, and an optional `agent.toml` overriding the built-in
//! agent defaults (toolkits, tool limit, system prompt, binaries, and the
//! tools that always require human confirmation).

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming the user who authorizes tool access.
pub const USER_ID_VAR: &str = "ARCADE_USER_ID";
/// Environment variable selecting the LLM behind the agent.
pub const MODEL_VAR: &str = "OPENAI_MODEL";

/// Default instruction set for the Sheets agent.
///
/// A ReAct-style prompt: the agent reasons, names the tool and parameters it
/// will call, observes the result, and only then answers. Reads are preferred
/// before writes, and spreadsheet ids always come from tool output.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an AI ReAct agent that helps users inspect, create, and modify \
Google Sheets using a fixed set of tools. Operate transparently: show your \
reasoning, the tool you plan to use, the parameters you will pass, and the \
observation returned. Do not invent spreadsheet ids, sheet names, or tool \
results; rely on tool responses.

- If user input is ambiguous or missing required information (spreadsheet \
title, sheet name or id, cell coordinates), ask a clarifying question \
before calling tools.
- Prefer non-destructive reads first: SearchSpreadsheets to locate files, \
GetSpreadsheetMetadata to confirm sheet names and ids, GetSpreadsheet to \
read values. GetSpreadsheet accepts max_rows 1-1000 and max_cols 1-100.
- For writing, use WriteToCell for single cells, UpdateCells for bulk \
updates, AddNoteToCell for notes, and CreateSpreadsheet for new sheets.
- On 'Requested entity was not found' or permission errors, suggest \
GenerateGoogleFilePickerUrl so the user can select and authorize the file, \
then offer to retry.
- Confirm with the user before destructive actions such as bulk overwrites.
- When done, summarize what changed including ids, sheet names, and cell \
references.";

/// Required process environment, validated before the session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// Identifies who is authorizing each tool platform grant
    pub user_id: String,
    /// The LLM used inside the agent
    pub model: String,
}

impl EnvConfig {
    /// Read and validate the required environment variables.
    ///
    /// A missing or empty variable is fatal; the process must not enter the
    /// session loop without knowing who authorizes tools and which model runs.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let user_id = require_var(&get, USER_ID_VAR)?;
        let model = require_var(&get, MODEL_VAR)?;
        Ok(Self { user_id, model })
    }
}

fn require_var(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    match get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("Missing {key}. Add it to your environment or .env file."),
    }
}

/// `[agent]` section: how the bridge is invoked and what the agent can do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentSection {
    /// Agent bridge binary name or path
    #[serde(default = "default_agent_binary")]
    pub binary: String,
    /// Toolkits whose tools are made available to the agent
    #[serde(default = "default_toolkits")]
    pub toolkits: Vec<String>,
    /// Maximum number of tool definitions retrieved from the platform
    #[serde(default = "default_tool_limit")]
    pub tool_limit: u32,
    /// Instruction set defining agent behavior
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

/// `[auth]` section: how authorization waits are performed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSection {
    /// Authorization platform CLI binary name or path
    #[serde(default = "default_auth_binary")]
    pub binary: String,
}

/// `[approval]` section: which tool calls always need a yes/no from the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApprovalSection {
    /// Tools that trigger a human-in-the-loop interrupt before executing
    #[serde(default)]
    pub confirm_tools: Vec<String>,
}

fn default_agent_binary() -> String {
    "sheets-agent".to_string()
}

fn default_auth_binary() -> String {
    "arcade".to_string()
}

fn default_toolkits() -> Vec<String> {
    vec!["GoogleSheets".to_string()]
}

const fn default_tool_limit() -> u32 {
    100
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            binary: default_agent_binary(),
            toolkits: default_toolkits(),
            tool_limit: default_tool_limit(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            binary: default_auth_binary(),
        }
    }
}

/// Top-level chatbot configuration parsed from `agent.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    /// Agent bridge settings
    #[serde(default)]
    pub agent: AgentSection,
    /// Authorization platform settings
    #[serde(default)]
    pub auth: AuthSection,
    /// Human-in-the-loop settings
    #[serde(default)]
    pub approval: ApprovalSection,
}

impl ChatConfig {
    /// Parse an `agent.toml` file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse `agent.toml` content from a string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse agent.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.agent.binary.trim().is_empty() {
            bail!("agent.binary cannot be empty");
        }
        if self.auth.binary.trim().is_empty() {
            bail!("auth.binary cannot be empty");
        }

        if self.agent.toolkits.is_empty() {
            bail!("agent.toolkits cannot be empty; the agent would have no tools");
        }
        for toolkit in &self.agent.toolkits {
            if toolkit.trim().is_empty() {
                bail!("agent.toolkits contains a blank entry");
            }
        }

        // The tool platform caps definition retrieval at 1000
        if !(1..=1000).contains(&self.agent.tool_limit) {
            bail!(
                "agent.tool_limit must be between 1 and 1000, got {}",
                self.agent.tool_limit
            );
        }

        for tool in &self.approval.confirm_tools {
            if tool.trim().is_empty() {
                bail!("approval.confirm_tools contains a blank entry");
            }
        }

        Ok(())
    }
}
