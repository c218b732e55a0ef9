//! CLI command implementations for purefa-check.
//!
//! This module provides implementations for all CLI subcommands:
//! - `check`: the alert, occupancy, hardware and pod checks
//! - `config`: Configuration file generation
//! - `generate`: Test data generation

pub mod check;
pub mod config;
pub mod generate;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use generate::command_generate_testdata;
