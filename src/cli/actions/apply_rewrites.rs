//! ApplyRewrites action.
//!
//! Writes rewritten buffers back to disk. Used by the `logfix rewrite` command.

use crate::core::{FilePlan, PlanOutcome};

use super::operation::Operation;
use super::traits::Action;

/// Action to replace files with their rewritten content.
///
/// Only plans with at least one rewrite become operations; unchanged and
/// failed files are never written.
pub struct ApplyRewrites;

impl Action<FilePlan> for ApplyRewrites {
    fn to_operations(plans: &[FilePlan]) -> Vec<Operation> {
        plans
            .iter()
            .filter_map(|plan| match &plan.outcome {
                PlanOutcome::Rewritten(rewrite) => Some(Operation::ReplaceContent {
                    path: plan.path.clone(),
                    file_path: plan.file_path.clone(),
                    content: rewrite.content.clone(),
                    rewrites: rewrite.rewrites.clone(),
                }),
                PlanOutcome::Unchanged { .. } | PlanOutcome::Failed(_) => None,
            })
            .collect()
    }
}
