//! mdexec - run fenced markdown code blocks in terminal sessions
//!
//! This library provides the core functionality for finding runnable code
//! blocks in markdown, turning them into interpreter commands, and sending
//! them to terminal sessions with per-session affinity.

pub mod actions;
pub mod blocks;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod escape;
pub mod extract;
pub mod host;
pub mod logging;
pub mod probe;
pub mod runtime;
pub mod session;

// Shared fakes for the collaborator traits
#[cfg(test)]
pub mod test_support;
