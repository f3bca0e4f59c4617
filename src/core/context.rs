//! Run context: everything one invocation needs, resolved once.
//!
//! Configuration is loaded from the working directory, command-line
//! overrides are applied (CLI > config file > defaults), targets are
//! scanned, and the idiom catalog is compiled. Planning then reads and
//! rewrites every file in memory without touching the disk.

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use colored::Colorize;
use rayon::prelude::*;

use super::{
    file_scanner::{ScanOptions, scan_files},
    rewrite::{BufferRewrite, Rewriter, SkippedSite},
};
use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Read,
    Write,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Read => write!(f, "read failed"),
            FailureKind::Write => write!(f, "write failed"),
        }
    }
}

/// A per-file failure. Never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_path: String,
    pub kind: FailureKind,
    pub error: String,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.file_path, self.kind, self.error)
    }
}

/// What rewriting one file in memory produced.
#[derive(Debug, Clone)]
pub enum PlanOutcome {
    /// No call site rewritten; the file must not be written.
    Unchanged { skipped: Vec<SkippedSite> },
    Rewritten(BufferRewrite),
    Failed(FileFailure),
}

#[derive(Debug, Clone)]
pub struct FilePlan {
    pub path: PathBuf,
    /// Path relative to the run root, for reports.
    pub file_path: String,
    pub outcome: PlanOutcome,
}

impl FilePlan {
    pub fn skipped(&self) -> &[SkippedSite] {
        match &self.outcome {
            PlanOutcome::Unchanged { skipped } => skipped,
            PlanOutcome::Rewritten(rewrite) => &rewrite.skipped,
            PlanOutcome::Failed(_) => &[],
        }
    }
}

pub struct RunContext {
    pub config: Config,
    pub root_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub verbose: bool,
    rewriter: Rewriter,
}

impl RunContext {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        Self::with_root(&env::current_dir()?, args)
    }

    /// Build a context rooted at `root_dir` instead of the working directory.
    pub fn with_root(root_dir: &Path, args: &CommonArgs) -> Result<Self> {
        let verbose = args.verbose;
        let config_result = load_config(root_dir)?;

        if verbose {
            match &config_result.path {
                Some(path) => eprintln!("Note: using configuration from {}", path.display()),
                None => eprintln!("Note: No .logfixrc.json found, using default configuration"),
            }
        }

        let mut config = config_result.config;

        if !args.extensions.is_empty() {
            config.extensions = args.extensions.clone();
        }
        if args.recursive {
            config.recursive = true;
        }
        if let Some(mode) = args.scan_mode {
            config.scan_mode = mode;
        }
        config.validate()?;

        let targets: Vec<String> = if args.paths.is_empty() {
            config.includes.clone()
        } else {
            args.paths
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect()
        };

        let scan_result = scan_files(
            root_dir,
            &ScanOptions {
                targets: &targets,
                extensions: &config.extensions,
                recursive: config.recursive,
                ignores: &config.ignores,
                verbose,
            },
        );

        if scan_result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        let rewriter = Rewriter::new(&config.idioms, config.scan_mode)?;

        Ok(Self {
            config,
            root_dir: root_dir.to_path_buf(),
            files: scan_result.files,
            missing: scan_result.missing,
            verbose,
            rewriter,
        })
    }

    pub fn rewriter(&self) -> &Rewriter {
        &self.rewriter
    }

    /// Path for reports: relative to the run root when possible.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    /// Read and rewrite every file in memory.
    ///
    /// Missing targets come first, then files in sorted order. Files are
    /// independent, so reading and rewriting run in parallel.
    pub fn plan(&self) -> Vec<FilePlan> {
        let missing = self.missing.iter().map(|path| {
            let file_path = self.display_path(path);
            FilePlan {
                path: path.clone(),
                file_path: file_path.clone(),
                outcome: PlanOutcome::Failed(FileFailure {
                    file_path,
                    kind: FailureKind::NotFound,
                    error: "No such file or directory".to_string(),
                }),
            }
        });

        let planned: Vec<FilePlan> = self
            .files
            .par_iter()
            .map(|path| {
                let file_path = self.display_path(path);
                let outcome = match fs::read_to_string(path) {
                    Ok(buffer) => {
                        let rewrite = self.rewriter.rewrite(&buffer);
                        if rewrite.is_changed() {
                            PlanOutcome::Rewritten(rewrite)
                        } else {
                            PlanOutcome::Unchanged {
                                skipped: rewrite.skipped,
                            }
                        }
                    }
                    Err(err) => PlanOutcome::Failed(FileFailure {
                        file_path: file_path.clone(),
                        kind: FailureKind::Read,
                        error: err.to_string(),
                    }),
                };
                FilePlan {
                    path: path.clone(),
                    file_path,
                    outcome,
                }
            })
            .collect();

        missing.chain(planned).collect()
    }
}
