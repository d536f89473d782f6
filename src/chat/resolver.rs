//! Interrupt resolver
//!
//! Turns a batch of interrupts into an equally sized, equally ordered batch
//! of resume decisions. Each interrupt is a small two-branch state machine:
//! an authorization requirement blocks on the out-of-band grant, a
//! human-in-the-loop requirement blocks on an interactive yes/no prompt, and
//! anything else is refused. Resolution never fails the turn; every failure
//! path collapses to "not authorized".

use crate::agent::interrupt::{Decision, Interrupt};
use crate::auth::AuthWaiter;
use crate::cli::display::ChatDisplay;
use crate::cli::prompt::Approver;

/// Question shown for each human-in-the-loop interrupt.
const APPROVAL_QUESTION: &str = "Do you approve this tool call?";

/// Resolve every interrupt in a round, in order.
///
/// Returns exactly one decision per interrupt; the caller resumes the agent
/// with the whole batch so each decision reaches its originating suspension
/// point by position.
pub async fn resolve_interrupts<W, A>(
    interrupts: &[Interrupt],
    waiter: &mut W,
    approver: &mut A,
    display: ChatDisplay,
) -> Vec<Decision>
where
    W: AuthWaiter + Send,
    A: Approver + Send,
{
    let mut decisions = Vec::with_capacity(interrupts.len());
    for interrupt in interrupts {
        decisions.push(resolve_one(interrupt, waiter, approver, display).await);
    }
    decisions
}

async fn resolve_one<W, A>(
    interrupt: &Interrupt,
    waiter: &mut W,
    approver: &mut A,
    display: ChatDisplay,
) -> Decision
where
    W: AuthWaiter + Send,
    A: Approver + Send,
{
    match interrupt {
        Interrupt::AuthorizationRequired {
            tool_name,
            auth_url,
            auth_id,
        } => {
            display.auth_required(tool_name, auth_url);
            match waiter.wait_for_completion(auth_id).await {
                Ok(()) => {
                    display.auth_granted();
                    Decision::ALLOW
                }
                Err(err) => {
                    display.auth_failed(&err);
                    Decision::DENY
                }
            }
        }
        Interrupt::ApprovalRequired { tool_name, input } => {
            display.approval_required(tool_name, input);
            match approver.confirm(APPROVAL_QUESTION) {
                Ok(approved) => Decision {
                    authorized: approved,
                },
                Err(err) => {
                    display.turn_failed(&err);
                    Decision::DENY
                }
            }
        }
        Interrupt::Unrecognized { .. } => {
            display.unrecognized_interrupt();
            Decision::DENY
        }
    }
}
