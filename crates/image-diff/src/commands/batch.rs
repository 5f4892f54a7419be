use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use glob::Pattern;
use tracing::debug;

use crate::batch::{BatchPlan, PairStatus, ensure_output_outside};
use crate::codec;
use crate::config::ResolvedRunConfig;
use crate::report::terminal::{self, BatchCounts};
use crate::store;

/// `image-diff batch`: compare every same-named PNG in two directories.
/// Returns exit code: 0 = all pass, 1 = any fail, error or new.
pub async fn batch(
    left: &Path,
    right: &Path,
    output: &Path,
    filter: Option<&str>,
    config: ResolvedRunConfig,
) -> Result<i32> {
    let pattern = filter
        .map(Pattern::new)
        .transpose()
        .with_context(|| format!("Invalid --filter pattern {:?}", filter.unwrap_or_default()))?;
    let plan = BatchPlan::scan(left, right, pattern.as_ref())?;
    ensure_output_outside(output, left, right)?;

    store::clean_output_files(output, &plan.pairs);

    let mut counts = BatchCounts {
        total: plan.total(),
        gone: plan.gone.len(),
        ..Default::default()
    };
    let mut failed_names: Vec<String> = Vec::new();
    let mut errored_names: Vec<String> = Vec::new();
    let new_names = plan.new.clone();
    let gone_names = plan.gone.clone();

    for name in &new_names {
        counts.record(&PairStatus::New);
        terminal::print_line(name, &PairStatus::New, Duration::ZERO);
    }

    let run_start = Instant::now();
    let total = counts.total;
    let max_ratio = config.batch.max_ratio();
    let mut rx = plan.execute(config.options, max_ratio, config.batch.parallel());

    let mut done = 0usize;
    debug!(total, "waiting for comparison results");
    while let Some((name, outcome)) = rx.recv().await {
        done += 1;
        debug!(done, total, name = %name, "received result");

        let mut status = outcome.status;
        if let Some(png) = &outcome.diff_png
            && let Err(e) = codec::write_file(&store::png_path(output, &name), png)
        {
            status = PairStatus::Error(format!("{e:#}"));
        }

        counts.record(&status);
        match &status {
            PairStatus::Fail { .. } => failed_names.push(name.clone()),
            PairStatus::Error(_) => errored_names.push(name.clone()),
            PairStatus::Pass | PairStatus::New => {}
        }

        terminal::print_line(&name, &status, outcome.elapsed);
        terminal::show_progress(done, total);
    }

    for name in &gone_names {
        terminal::print_gone_line(name);
    }

    failed_names.sort();
    errored_names.sort();
    terminal::print_actionable_summary(&failed_names, &new_names, &errored_names, &gone_names);
    terminal::print_summary(&counts, output, run_start.elapsed());

    Ok(counts.exit_code())
}
