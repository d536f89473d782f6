//! Chat session management
//!
//! This module handles configuration, the session context, the per-turn
//! drive loop, and interrupt resolution.

pub mod config;
pub mod resolver;
pub mod session;
