//! Session context and turn driver
//!
//! A `SessionContext` is created once at process start and passed through
//! every call, so all turns correlate to one conversation history owned by
//! the external runtime. `Session` drives a single turn to completion:
//! stream the agent, resolve any interrupts as one ordered batch, resume,
//! and repeat until a round completes without suspending.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::agent::bridge::{AgentRuntime, TurnInput};
use crate::auth::AuthWaiter;
use crate::chat::resolver::resolve_interrupts;
use crate::cli::display::ChatDisplay;
use crate::cli::prompt::Approver;

/// Identifies one conversation for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Correlates all turns to one persisted conversation history
    pub id: String,
    /// When the session was created
    pub started_at: DateTime<Utc>,
}

impl SessionContext {
    /// Create a context with a timestamp-derived session id.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: format!("session-{}", now.format("%Y%m%d%H%M%S")),
            started_at: now,
        }
    }

    /// Create a context with an explicit session id.
    #[must_use]
    pub fn with_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            started_at: Utc::now(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of one completed turn, used for the transcript log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// Number of streaming rounds the turn took (1 when nothing suspended)
    pub rounds: u32,
    /// Every resume decision made during the turn, in resolution order
    pub decisions: Vec<bool>,
    /// Final result text, if the agent produced one
    pub result_text: Option<String>,
}

/// Drives conversational turns against the agent runtime.
pub struct Session<R, W, A> {
    runtime: R,
    waiter: W,
    approver: A,
    context: SessionContext,
    display: ChatDisplay,
}

impl<R, W, A> Session<R, W, A>
where
    R: AgentRuntime + Send,
    W: AuthWaiter + Send,
    A: Approver + Send,
{
    /// Create a session from its collaborators.
    pub const fn new(
        runtime: R,
        waiter: W,
        approver: A,
        context: SessionContext,
        display: ChatDisplay,
    ) -> Self {
        Self {
            runtime,
            waiter,
            approver,
            context,
            display,
        }
    }

    /// The context this session was created with.
    pub const fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Drive one user turn to completion, including all resume rounds.
    ///
    /// A round that yields zero interrupts ends the turn immediately;
    /// otherwise every interrupt is resolved and the agent is resumed with
    /// the ordered decision batch before streaming again.
    pub async fn run_turn(&mut self, text: &str) -> Result<TurnReport> {
        let mut input = TurnInput::Message(text.to_string());
        let mut report = TurnReport {
            rounds: 0,
            decisions: Vec::new(),
            result_text: None,
        };

        loop {
            let round = self.runtime.run_turn(&input, &self.context.id).await?;
            report.rounds += 1;
            if round.result_text.is_some() {
                report.result_text = round.result_text;
            }

            if round.interrupts.is_empty() {
                break;
            }

            let decisions = resolve_interrupts(
                &round.interrupts,
                &mut self.waiter,
                &mut self.approver,
                self.display,
            )
            .await;
            report
                .decisions
                .extend(decisions.iter().map(|d| d.authorized));
            input = TurnInput::Resume(decisions);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::bridge::TurnRound;
    use crate::agent::interrupt::Interrupt;
    use anyhow::bail;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;

    struct FakeRuntime {
        rounds: VecDeque<Result<TurnRound>>,
        inputs: Vec<TurnInput>,
        session_ids: Vec<String>,
    }

    impl FakeRuntime {
        fn scripted(rounds: Vec<Result<TurnRound>>) -> Self {
            Self {
                rounds: rounds.into_iter().collect(),
                inputs: Vec::new(),
                session_ids: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl AgentRuntime for FakeRuntime {
        async fn run_turn(&mut self, input: &TurnInput, session_id: &str) -> Result<TurnRound> {
            self.inputs.push(input.clone());
            self.session_ids.push(session_id.to_string());
            match self.rounds.pop_front() {
                Some(round) => round,
                None => bail!("unexpected extra round"),
            }
        }
    }

    struct GrantingWaiter;

    #[async_trait]
    impl AuthWaiter for GrantingWaiter {
        async fn wait_for_completion(&mut self, _auth_id: &str) -> Result<()> {
            Ok(())
        }
    }

    struct ScriptedApprover {
        answers: VecDeque<bool>,
    }

    impl Approver for ScriptedApprover {
        fn confirm(&mut self, _question: &str) -> Result<bool> {
            match self.answers.pop_front() {
                Some(answer) => Ok(answer),
                None => bail!("approver should not have been consulted"),
            }
        }
    }

    fn approval(tool: &str) -> Interrupt {
        Interrupt::ApprovalRequired {
            tool_name: tool.to_string(),
            input: json!({}),
        }
    }

    fn clean_round(result: &str) -> TurnRound {
        TurnRound {
            interrupts: vec![],
            result_text: Some(result.to_string()),
            is_error: false,
        }
    }

    fn suspended_round(interrupts: Vec<Interrupt>) -> TurnRound {
        TurnRound {
            interrupts,
            result_text: None,
            is_error: false,
        }
    }

    fn session(
        runtime: FakeRuntime,
        answers: &[bool],
    ) -> Session<FakeRuntime, GrantingWaiter, ScriptedApprover> {
        Session::new(
            runtime,
            GrantingWaiter,
            ScriptedApprover {
                answers: answers.iter().copied().collect(),
            },
            SessionContext::with_id("s-test"),
            ChatDisplay::new(),
        )
    }

    #[test]
    fn test_context_ids() {
        let ctx = SessionContext::with_id("abc");
        assert_eq!(ctx.id, "abc");

        let generated = SessionContext::new();
        assert!(generated.id.starts_with("session-"));
    }

    #[tokio::test]
    async fn test_clean_turn_ends_after_one_round() {
        let runtime = FakeRuntime::scripted(vec![Ok(clean_round("All done."))]);
        let mut session = session(runtime, &[]);

        let report = session.run_turn("hello").await.unwrap();

        assert_eq!(report.rounds, 1);
        assert!(report.decisions.is_empty());
        assert_eq!(report.result_text.as_deref(), Some("All done."));
    }

    #[tokio::test]
    async fn test_clean_turn_sends_user_message_with_session_id() {
        let runtime = FakeRuntime::scripted(vec![Ok(clean_round("ok"))]);
        let mut session = session(runtime, &[]);

        session.run_turn("find my budget sheet").await.unwrap();

        assert_eq!(
            session.runtime.inputs,
            vec![TurnInput::Message("find my budget sheet".to_string())]
        );
        assert_eq!(session.runtime.session_ids, vec!["s-test"]);
    }

    #[tokio::test]
    async fn test_suspended_turn_resumes_with_ordered_decisions() {
        let runtime = FakeRuntime::scripted(vec![
            Ok(suspended_round(vec![
                approval("GoogleSheets_WriteToCell"),
                approval("GoogleSheets_UpdateCells"),
            ])),
            Ok(clean_round("written")),
        ]);
        let mut session = session(runtime, &[true, false]);

        let report = session.run_turn("write it").await.unwrap();

        assert_eq!(report.rounds, 2);
        assert_eq!(report.decisions, vec![true, false]);
        match &session.runtime.inputs[1] {
            TurnInput::Resume(decisions) => {
                assert_eq!(decisions.len(), 2);
                assert!(decisions[0].authorized);
                assert!(!decisions[1].authorized);
            }
            other => panic!("Expected Resume, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_turn_loops_until_a_round_has_no_interrupts() {
        let runtime = FakeRuntime::scripted(vec![
            Ok(suspended_round(vec![approval("first")])),
            Ok(suspended_round(vec![approval("second")])),
            Ok(clean_round("finally")),
        ]);
        let mut session = session(runtime, &[true, true]);

        let report = session.run_turn("multi-step").await.unwrap();

        assert_eq!(report.rounds, 3);
        assert_eq!(report.decisions, vec![true, true]);
        assert!(matches!(session.runtime.inputs[0], TurnInput::Message(_)));
        assert!(matches!(session.runtime.inputs[1], TurnInput::Resume(_)));
        assert!(matches!(session.runtime.inputs[2], TurnInput::Resume(_)));
    }

    #[tokio::test]
    async fn test_runtime_error_aborts_only_this_turn() {
        let runtime = FakeRuntime::scripted(vec![Err(anyhow::anyhow!("bridge unreachable"))]);
        let mut session = session(runtime, &[]);

        let err = session.run_turn("hello").await.unwrap_err();
        assert!(err.to_string().contains("bridge unreachable"));

        // The session object is still usable for the next prompt
        session.runtime.rounds.push_back(Ok(clean_round("recovered")));
        let report = session.run_turn("again").await.unwrap();
        assert_eq!(report.result_text.as_deref(), Some("recovered"));
    }

    #[tokio::test]
    async fn test_result_text_from_earlier_round_is_kept() {
        // A round may carry a result and still suspend; the report keeps the
        // latest result seen across rounds
        let runtime = FakeRuntime::scripted(vec![
            Ok(TurnRound {
                interrupts: vec![approval("tool")],
                result_text: Some("partial".to_string()),
                is_error: false,
            }),
            Ok(TurnRound {
                interrupts: vec![],
                result_text: None,
                is_error: false,
            }),
        ]);
        let mut session = session(runtime, &[true]);

        let report = session.run_turn("go").await.unwrap();
        assert_eq!(report.result_text.as_deref(), Some("partial"));
    }
}
