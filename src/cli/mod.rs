//! Command-line interface layer.
//!
//! Kept apart from `core` so logfix can be used as a library: everything
//! that prints or decides exit codes lives here.

use anyhow::Result;

pub mod actions;
pub mod args;
pub mod commands;
pub mod exit_status;
pub mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    run::run(args)
}
