//! Tool-authorization platform integration
//!
//! This module exposes the blocking "wait for completion" operation of the
//! external authorization platform behind a trait seam.

pub mod wait;

pub use wait::{AuthWaiter, CliAuthWaiter};
