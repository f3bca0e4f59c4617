//! Report formatting and printing utilities.
//!
//! Rewrites, skipped call sites and failures are displayed in cargo-style
//! format. Kept out of `core` so the engine never prints.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthChar;

use crate::core::{AppliedRewrite, FileFailure, SkippedSite, SourceLocation};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print a dry-run preview of the rewrites planned for one file.
///
/// Each rewrite shows its location, the first line of the original call
/// with a caret under the call, then the old and new call text.
pub fn print_rewrites_to<W: Write>(file_path: &str, rewrites: &[AppliedRewrite], writer: &mut W) {
    let max_line_width = line_width(rewrites.iter().map(|r| r.location));

    for rewrite in rewrites {
        let _ = writeln!(
            writer,
            "{}: {}  {}",
            "rewrite".bold().cyan(),
            rewrite.level.destination(),
            rewrite.idiom.dimmed().cyan()
        );
        print_location(
            writer,
            file_path,
            rewrite.location,
            &rewrite.source_line,
            "^".cyan().to_string(),
            max_line_width,
        );
        for line in rewrite.original.lines() {
            let _ = writeln!(
                writer,
                "{:>width$} {} {}",
                "",
                "-".red(),
                line.red(),
                width = max_line_width
            );
        }
        for line in rewrite.replacement.lines() {
            let _ = writeln!(
                writer,
                "{:>width$} {} {}",
                "",
                "+".green(),
                line.green(),
                width = max_line_width
            );
        }
        let _ = writeln!(writer);
    }
}

/// Print warnings for call sites that matched but were left untouched.
pub fn print_skipped(file_path: &str, skipped: &[SkippedSite]) {
    print_skipped_to(file_path, skipped, &mut io::stderr().lock());
}

/// Print skipped call sites to a custom writer.
pub fn print_skipped_to<W: Write>(file_path: &str, skipped: &[SkippedSite], writer: &mut W) {
    let max_line_width = line_width(skipped.iter().map(|s| s.location));

    for site in skipped {
        let _ = writeln!(
            writer,
            "{} call site left unchanged  {}",
            "warning:".bold().yellow(),
            site.idiom.dimmed().cyan()
        );
        print_location(
            writer,
            file_path,
            site.location,
            &site.source_line,
            "^".yellow().to_string(),
            max_line_width,
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "reason:".bold(),
            site.reason,
            width = max_line_width
        );
        let _ = writeln!(writer);
    }
}

/// Print per-file failures to stderr.
pub fn print_failures(failures: &[FileFailure]) {
    print_failures_to(failures, &mut io::stderr().lock());
}

/// Print per-file failures to a custom writer.
pub fn print_failures_to<W: Write>(failures: &[FileFailure], writer: &mut W) {
    for failure in failures {
        let _ = writeln!(
            writer,
            "{} {} {}: {}",
            FAILURE_MARK.red(),
            failure.file_path,
            format!("({})", failure.kind).red(),
            failure.error
        );
    }
}

/// Print the line for one processed file that had changes.
pub fn print_file_line_to<W: Write>(file_path: &str, count: usize, apply: bool, writer: &mut W) {
    let verb = if apply { "rewrote" } else { "would rewrite" };
    let _ = writeln!(
        writer,
        "{} {}: {} {} call(s)",
        SUCCESS_MARK.green(),
        file_path,
        verb,
        count
    );
}

/// Print the verbose line for a file with nothing to rewrite.
pub fn print_unchanged_to<W: Write>(file_path: &str, writer: &mut W) {
    let _ = writeln!(writer, "  {} {}", "no matches:".dimmed(), file_path.dimmed());
}

/// Print one completion line per idiom, in catalog order.
pub fn print_idiom_totals(totals: &[(String, usize)], apply: bool) {
    print_idiom_totals_to(totals, apply, &mut io::stdout().lock());
}

/// Print idiom completion lines to a custom writer.
pub fn print_idiom_totals_to<W: Write>(totals: &[(String, usize)], apply: bool, writer: &mut W) {
    let verb = if apply { "rewritten" } else { "to rewrite" };
    for (name, count) in totals {
        let _ = writeln!(
            writer,
            "{} {}: {} call(s) {}",
            SUCCESS_MARK.green(),
            name.bold(),
            count,
            verb
        );
    }
}

/// Print the final summary of a rewrite run.
pub fn print_summary(summary: &RunSummary) {
    print_summary_to(summary, &mut io::stdout().lock());
}

/// Counts gathered over a whole run, for the closing summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub rewrites: usize,
    pub files_changed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub apply: bool,
}

/// Print the run summary to a custom writer.
pub fn print_summary_to<W: Write>(summary: &RunSummary, writer: &mut W) {
    if summary.rewrites == 0 {
        if summary.failed == 0 {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                format!(
                    "Scanned {} {} - no calls to rewrite",
                    summary.files_scanned,
                    if summary.files_scanned == 1 { "file" } else { "files" }
                )
                .green()
            );
        }
    } else if summary.apply {
        let _ = writeln!(
            writer,
            "{} {} call(s) in {} file(s).",
            "Rewrote".green().bold(),
            summary.rewrites,
            summary.files_changed
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {} call(s) in {} file(s).",
            "Would rewrite".yellow().bold(),
            summary.rewrites,
            summary.files_changed
        );
        let _ = writeln!(writer, "Run with {} to write these changes.", "--apply".cyan());
    }

    if summary.skipped > 0 {
        let _ = writeln!(
            writer,
            "Note: {} call site(s) left unchanged (see warnings).",
            summary.skipped
        );
    }
    if summary.failed > 0 {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be processed.",
            FAILURE_MARK.red(),
            summary.failed
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_location<W: Write>(
    writer: &mut W,
    file_path: &str,
    location: SourceLocation,
    source_line: &str,
    caret: String,
    max_line_width: usize,
) {
    let SourceLocation { line, col } = location;
    let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        line.to_string().blue(),
        "|".blue(),
        source_line,
        width = max_line_width
    );

    // col is 1-based and counts chars; tabs are kept so the caret lines up
    let caret_padding: String = source_line
        .chars()
        .take(col.saturating_sub(1))
        .map(|c| match c {
            '\t' => "\t".to_string(),
            c => " ".repeat(UnicodeWidthChar::width(c).unwrap_or(0)),
        })
        .collect();
    let _ = writeln!(
        writer,
        "{:>width$} {} {}{}",
        "",
        "|".blue(),
        caret_padding,
        caret,
        width = max_line_width
    );
}

fn line_width(locations: impl Iterator<Item = SourceLocation>) -> usize {
    locations
        .map(|loc| loc.line.to_string().len())
        .max()
        .unwrap_or(1)
        .max(3)
}
