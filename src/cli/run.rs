use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{idioms::idioms, init::init, rewrite::rewrite},
    exit_status::ExitStatus,
};

/// Dispatch to the handler of the parsed command.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Rewrite(cmd)) => rewrite(cmd),
        Some(Command::Idioms) => idioms(),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
