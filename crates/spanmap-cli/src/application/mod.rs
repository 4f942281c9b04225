//! Use cases behind each CLI subcommand.

pub mod commands;

pub use commands::{run_export, run_layout, run_plan, run_url, CommandError};
