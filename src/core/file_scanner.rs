use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::{MatchOptions, Pattern, glob};
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal path prefixes.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Which files to look at, resolved against a base directory.
pub struct ScanOptions<'a> {
    pub targets: &'a [String],
    pub extensions: &'a [String],
    pub recursive: bool,
    pub ignores: &'a [String],
    pub verbose: bool,
}

/// Result of scanning files.
pub struct ScanResult {
    /// Files to process, sorted.
    pub files: Vec<PathBuf>,
    /// Targets that do not exist.
    pub missing: Vec<PathBuf>,
    /// Directory entries that could not be read.
    pub skipped_count: usize,
}

/// Resolve targets into the list of files to process.
///
/// A target naming a file is taken as-is, whatever its extension. A target
/// naming a directory contributes its files with a matching extension, one
/// level deep unless `recursive` is set. A glob target (`db/*.go`) expands to
/// the files and directories it matches; matched files must carry a
/// configured extension. A target that matches nothing is reported missing.
pub fn scan_files(base_dir: &Path, options: &ScanOptions<'_>) -> ScanResult {
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    let mut missing = Vec::new();
    let mut skipped_count = 0;

    let ignores = Ignores::new(base_dir, options.ignores, options.verbose);
    let max_depth = if options.recursive { usize::MAX } else { 1 };

    let mut walk_dir = |dir: &Path, files: &mut BTreeSet<PathBuf>| {
        for entry in WalkDir::new(dir).max_depth(max_depth) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    skipped_count += 1;
                    if options.verbose {
                        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                    }
                    continue;
                }
            };
            let path = entry.path();

            if ignores.matches(path) {
                continue;
            }

            if entry.file_type().is_file() && has_extension(path, options.extensions) {
                files.insert(path.to_path_buf());
            }
        }
    };

    for target in options.targets {
        // drop `.` components so reported paths stay clean
        let target_path: PathBuf = base_dir.join(target).components().collect();

        if is_glob_pattern(target) {
            let matched = expand_glob(&target_path, options.verbose);
            if matched.is_empty() {
                missing.push(target_path);
                continue;
            }
            for path in matched {
                if path.is_dir() {
                    walk_dir(&path, &mut files);
                } else if has_extension(&path, options.extensions) && !ignores.matches(&path) {
                    files.insert(path);
                }
            }
            continue;
        }

        if target_path.is_file() {
            if !ignores.matches(&target_path) {
                files.insert(target_path);
            }
            continue;
        }
        if !target_path.is_dir() {
            missing.push(target_path);
            continue;
        }

        walk_dir(&target_path, &mut files);
    }

    ScanResult {
        files: files.into_iter().collect(),
        missing,
        skipped_count,
    }
}

/// Expand a glob target; an invalid pattern matches nothing.
fn expand_glob(pattern: &Path, verbose: bool) -> Vec<PathBuf> {
    let pattern_str = pattern.to_string_lossy();
    match glob(&pattern_str) {
        Ok(entries) => entries.flatten().collect(),
        Err(e) => {
            if verbose {
                eprintln!(
                    "{} Invalid glob pattern '{}': {}",
                    "warning:".bold().yellow(),
                    pattern.display(),
                    e
                );
            }
            Vec::new()
        }
    }
}

/// Ignore rules: literal path prefixes and glob patterns.
///
/// Globs are tried against the path relative to the base directory and
/// against the full path, so both `gen/*.go` and `**/gen/*.go` work.
struct Ignores<'a> {
    base_dir: &'a Path,
    literal_paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl<'a> Ignores<'a> {
    fn new(base_dir: &'a Path, ignores: &[String], verbose: bool) -> Self {
        let mut literal_paths: Vec<PathBuf> = Vec::new();
        let mut patterns: Vec<Pattern> = Vec::new();

        for p in ignores {
            if is_glob_pattern(p) {
                match Pattern::new(p) {
                    Ok(pattern) => patterns.push(pattern),
                    Err(e) => {
                        if verbose {
                            eprintln!(
                                "{} Invalid ignore pattern '{}': {}",
                                "warning:".bold().yellow(),
                                p,
                                e
                            );
                        }
                    }
                }
            } else {
                literal_paths.push(base_dir.join(p).components().collect());
            }
        }

        Self {
            base_dir,
            literal_paths,
            patterns,
        }
    }

    fn matches(&self, path: &Path) -> bool {
        if self.literal_paths.iter().any(|ignore| path.starts_with(ignore)) {
            return true;
        }
        // `*` stays within one path segment; `**` crosses directories
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        let relative = path.strip_prefix(self.base_dir).ok();
        self.patterns.iter().any(|pattern| {
            pattern.matches_path_with(path, options)
                || relative.is_some_and(|rel| pattern.matches_path_with(rel, options))
        })
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.') == ext)
        })
}
