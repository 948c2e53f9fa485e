//! Line-oriented shell over a budget book and its payment ledger.

mod commands;
pub mod output;
mod shell;
pub mod shell_context;

pub use shell::run_cli;
pub use shell_context::{CliMode, ShellContext};
