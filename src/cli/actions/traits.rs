//! Action trait definition.
//!
//! Actions convert planned results into Operations. Each Action can be
//! implemented for multiple input types.

use std::collections::HashSet;

use super::operation::Operation;
use crate::core::{FailureKind, FileFailure};

/// Statistics from running an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionStats {
    /// Number of operations processed.
    pub processed: usize,
    /// Number of changes actually applied to files.
    pub changes_applied: usize,
    /// Number of files modified.
    pub files_modified: usize,
    /// Files whose operation failed; the rest of the batch still ran.
    pub failed: Vec<FileFailure>,
}

impl std::ops::AddAssign for ActionStats {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.changes_applied += other.changes_applied;
        self.files_modified += other.files_modified;
        self.failed.extend(other.failed);
    }
}

/// Action trait - converts inputs into Operations and executes them.
///
/// # Example
///
/// ```ignore
/// // In command code:
/// if apply {
///     ApplyRewrites::run(&plans);
/// } else {
///     ApplyRewrites::preview(&plans);
/// }
/// ```
pub trait Action<I> {
    /// Convert inputs to low-level operations.
    ///
    /// This is the only method that must be implemented.
    fn to_operations(inputs: &[I]) -> Vec<Operation>;

    /// Execute the action (modify files).
    fn run(inputs: &[I]) -> ActionStats {
        let ops = Self::to_operations(inputs);
        execute_operations(&ops)
    }

    /// Preview the action (dry-run mode).
    fn preview(inputs: &[I]) {
        let ops = Self::to_operations(inputs);
        for op in &ops {
            op.preview();
        }
    }
}

/// Execute every operation, recording failures per file instead of stopping.
fn execute_operations(ops: &[Operation]) -> ActionStats {
    let mut files_modified: HashSet<&str> = HashSet::new();
    let mut changes_applied = 0;
    let mut failed = Vec::new();

    for op in ops {
        match op.execute() {
            Ok(()) => {
                changes_applied += op.change_count();
                files_modified.insert(op.file_path());
            }
            Err(err) => failed.push(FileFailure {
                file_path: op.file_path().to_string(),
                kind: FailureKind::Write,
                error: format!("{:#}", err),
            }),
        }
    }

    ActionStats {
        processed: ops.len(),
        changes_applied,
        files_modified: files_modified.len(),
        failed,
    }
}
