//! Low-level file operations.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::cli::report;
use crate::core::AppliedRewrite;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Replace a file's content with its rewritten buffer.
    ReplaceContent {
        path: PathBuf,
        file_path: String,
        content: String,
        rewrites: Vec<AppliedRewrite>,
    },
}

impl Operation {
    pub fn file_path(&self) -> &str {
        match self {
            Operation::ReplaceContent { file_path, .. } => file_path,
        }
    }

    /// Number of call sites this operation changes.
    pub fn change_count(&self) -> usize {
        match self {
            Operation::ReplaceContent { rewrites, .. } => rewrites.len(),
        }
    }

    pub fn execute(&self) -> Result<()> {
        match self {
            Operation::ReplaceContent { path, content, .. } => write_atomically(path, content),
        }
    }

    pub fn preview(&self) {
        self.preview_to(&mut io::stdout().lock());
    }

    pub fn preview_to<W: Write>(&self, writer: &mut W) {
        match self {
            Operation::ReplaceContent {
                file_path,
                rewrites,
                ..
            } => report::print_rewrites_to(file_path, rewrites, writer),
        }
    }
}

/// Write `content` to `path` through a temporary file in the same directory.
///
/// The original is replaced by rename, so a failed write never leaves a
/// partially written file behind. Permissions of the original are kept.
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?
        .permissions();

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in: {}", dir.display()))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    temp.as_file()
        .set_permissions(permissions)
        .with_context(|| format!("Failed to set permissions: {}", path.display()))?;
    temp.persist(path)
        .with_context(|| format!("Failed to replace file: {}", path.display()))?;
    Ok(())
}
