//! Command shell over the recurrence engine, interactive or driven from stdin.

mod commands;
pub mod context;
pub mod output;
pub mod registry;
mod shell;

pub use context::{CliError, CliMode, CommandError, ShellContext};
pub use shell::{run_cli, run_script};
