//! Agent runtime integration
//!
//! This module handles interrupt classification, stream-JSON output parsing,
//! and the bridge subprocess that reaches the hosted agent runtime.

pub mod bridge;
pub mod interrupt;
pub mod stream;
