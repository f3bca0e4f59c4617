//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `rewrite`: Rewrite structured logging calls (dry-run unless `--apply`)
//! - `idioms`: List the active idiom catalog
//! - `init`: Initialize logfix configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::ScanMode;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Rewrite(cmd)) => cmd.args.common.verbose,
            Some(Command::Idioms) | Some(Command::Init) | None => false,
        }
    }
}

/// Arguments that select files and tune scanning.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Files or directories to process (overrides `includes` in config file)
    pub paths: Vec<PathBuf>,

    /// File extension picked up in directories (overrides config file, repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Descend into subdirectories
    #[arg(long)]
    pub recursive: bool,

    /// How field maps are bounded (overrides config file)
    #[arg(long, value_enum)]
    pub scan_mode: Option<ScanMode>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct RewriteArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write rewritten files (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Args)]
pub struct RewriteCommand {
    #[command(flatten)]
    pub args: RewriteArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rewrite WithFields logging calls into printf-style calls
    Rewrite(RewriteCommand),
    /// List the idioms that will be rewritten
    Idioms,
    /// Initialize a new .logfixrc.json configuration file
    Init,
}
