//! CLI command implementations for smaps-analyzer.
//!
//! This module provides implementations for:
//! - `analyze`: the default report run over files, pids or matched processes
//! - `check`: configuration and /proc validation
//! - `config`: configuration file generation

pub mod analyze;
pub mod check;
pub mod config;

// Re-export command functions
pub use analyze::command_analyze;
pub use check::command_check;
pub use config::command_config;
