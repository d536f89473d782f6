//! Blocking wait for out-of-band authorization grants
//!
//! When a tool call suspends on an authorization requirement, the user
//! completes the grant in a browser while the session blocks here. The wait
//! is keyed by the authorization request id and is unbounded; the platform
//! CLI decides when to give up.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

/// Waits for an authorization request to be completed out-of-band.
#[async_trait]
pub trait AuthWaiter {
    /// Block until the grant identified by `auth_id` completes.
    ///
    /// Returns an error if the grant was denied, expired, or the platform
    /// could not be reached. Callers map a failure to a "not authorized"
    /// decision rather than aborting the session.
    async fn wait_for_completion(&mut self, auth_id: &str) -> Result<()>;
}

/// Production waiter: delegates to the authorization platform CLI
/// (`<binary> auth wait <id>`), whose exit status signals the outcome.
pub struct CliAuthWaiter {
    binary: String,
}

impl CliAuthWaiter {
    /// Create a waiter for the given platform CLI binary.
    #[must_use]
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }
}

#[async_trait]
impl AuthWaiter for CliAuthWaiter {
    async fn wait_for_completion(&mut self, auth_id: &str) -> Result<()> {
        let status = Command::new(&self.binary)
            .arg("auth")
            .arg("wait")
            .arg(auth_id)
            .status()
            .await
            .with_context(|| format!("Failed to run '{} auth wait'", self.binary))?;

        if !status.success() {
            bail!(
                "Authorization wait for '{auth_id}' failed with {}",
                status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| format!("exit code {c}"))
            );
        }

        Ok(())
    }
}
