//! Idioms command - List the call idioms the rewriter recognizes.
//!
//! Reads the catalog from `.logfixrc.json` (or the built-in default) and
//! shows one example rewrite per idiom, in the order idioms are applied.

use std::{
    env,
    io::{self, Write},
};

use anyhow::Result;
use colored::Colorize;

use super::super::exit_status::ExitStatus;
use crate::{config::load_config, core::CallIdiom};

pub fn idioms() -> Result<ExitStatus> {
    let config = load_config(&env::current_dir()?)?.config;

    print_idioms_to(&config.idioms, &mut io::stdout().lock());
    Ok(ExitStatus::Success)
}

fn print_idioms_to<W: Write>(idioms: &[CallIdiom], writer: &mut W) {
    for (index, idiom) in idioms.iter().enumerate() {
        let levels: Vec<&str> = idiom.levels.iter().map(|level| level.name()).collect();
        let _ = writeln!(
            writer,
            "{}. {}  {}",
            index + 1,
            idiom.name.bold(),
            format!("[{}: {}]", idiom.shape, levels.join(", ")).dimmed()
        );
        let _ = writeln!(writer, "   {} {}", "-".red(), idiom.example_source());
        let _ = writeln!(writer, "   {} {}", "+".green(), idiom.example_rewrite());
    }
}
