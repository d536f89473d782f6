//! Logging and observability
//!
//! This module provides JSONL transcript logging for the chat session.

pub mod jsonl;

pub use jsonl::{TranscriptLogger, TurnRecord};
