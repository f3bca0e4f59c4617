//! Rewrite command - Turn WithFields logging calls into printf-style calls.
//!
//! Every target file is read and rewritten in memory first. In dry-run mode
//! (the default) the planned rewrites are previewed; with `--apply` changed
//! files are replaced atomically. Per-file failures are reported and never
//! stop the batch.

use std::{
    collections::{HashMap, HashSet},
    io,
};

use anyhow::Result;

use super::super::{
    actions::{Action, ApplyRewrites},
    args::RewriteCommand,
    exit_status::ExitStatus,
    report::{self, RunSummary},
};
use crate::core::{FileFailure, FilePlan, PlanOutcome, RunContext};

pub fn rewrite(cmd: RewriteCommand) -> Result<ExitStatus> {
    let args = &cmd.args;
    let ctx = RunContext::new(&args.common)?;
    let apply = args.apply;

    let plans = ctx.plan();

    let mut failures: Vec<FileFailure> = plans
        .iter()
        .filter_map(|plan| match &plan.outcome {
            PlanOutcome::Failed(failure) => Some(failure.clone()),
            _ => None,
        })
        .collect();

    for plan in &plans {
        let skipped = plan.skipped();
        if !skipped.is_empty() {
            report::print_skipped(&plan.file_path, skipped);
        }
    }

    if apply {
        let stats = ApplyRewrites::run(&plans);
        failures.extend(stats.failed);
    } else {
        ApplyRewrites::preview(&plans);
    }

    // Files that failed to write contribute nothing to the totals
    let failed_paths: HashSet<&str> = failures.iter().map(|f| f.file_path.as_str()).collect();
    let succeeded: Vec<&FilePlan> = plans
        .iter()
        .filter(|plan| !failed_paths.contains(plan.file_path.as_str()))
        .collect();

    print_file_lines(&succeeded, apply, ctx.verbose);

    let totals = idiom_totals(&ctx, &succeeded);
    report::print_idiom_totals(&totals, apply);

    if !failures.is_empty() {
        report::print_failures(&failures);
    }

    let rewrites: usize = totals.iter().map(|(_, count)| count).sum();
    let summary = RunSummary {
        files_scanned: ctx.files.len(),
        rewrites,
        files_changed: succeeded
            .iter()
            .filter(|plan| matches!(plan.outcome, PlanOutcome::Rewritten(_)))
            .count(),
        skipped: plans.iter().map(|plan| plan.skipped().len()).sum(),
        failed: failures.len(),
        apply,
    };
    report::print_summary(&summary);

    // In dry-run mode, pending rewrites are "Failure" (exit 1)
    // to signal that there's work to be done
    if !failures.is_empty() {
        Ok(ExitStatus::Error)
    } else if rewrites > 0 && !apply {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

fn print_file_lines(plans: &[&FilePlan], apply: bool, verbose: bool) {
    let mut stdout = io::stdout().lock();
    for plan in plans {
        match &plan.outcome {
            PlanOutcome::Rewritten(rewrite) => {
                report::print_file_line_to(&plan.file_path, rewrite.rewrites.len(), apply, &mut stdout)
            }
            PlanOutcome::Unchanged { .. } if verbose => {
                report::print_unchanged_to(&plan.file_path, &mut stdout)
            }
            PlanOutcome::Unchanged { .. } | PlanOutcome::Failed(_) => {}
        }
    }
}

/// Rewrite counts per idiom, in catalog order, zero counts included.
fn idiom_totals(ctx: &RunContext, plans: &[&FilePlan]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for plan in plans {
        if let PlanOutcome::Rewritten(rewrite) = &plan.outcome {
            for applied in &rewrite.rewrites {
                *counts.entry(applied.idiom.as_str()).or_default() += 1;
            }
        }
    }

    ctx.rewriter()
        .idioms()
        .map(|idiom| {
            let count = counts.get(idiom.name.as_str()).copied().unwrap_or(0);
            (idiom.name.clone(), count)
        })
        .collect()
}
