//! Directory-to-directory comparison: pairing files and running the
//! comparisons with bounded concurrency.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use image_diff_core::{CompareError, CompareOptions, compare};
use tokio::sync::{Semaphore, mpsc};
use tracing::debug;

use crate::codec;
use crate::store;

/// Status of a single image pair.
#[derive(Debug)]
pub enum PairStatus {
    Pass,
    Fail {
        mismatched_pixels: u64,
        ratio: f64,
        /// `Some((left_w, left_h, right_w, right_h))` when the images differ in size.
        dimension_mismatch: Option<(u32, u32, u32, u32)>,
    },
    /// Present only in the right directory.
    New,
    Error(String),
}

pub struct PairOutcome {
    pub status: PairStatus,
    /// Encoded diff image, produced for failed pairs of equal size.
    pub diff_png: Option<Vec<u8>>,
    pub elapsed: Duration,
}

/// Which files get compared, and which exist on one side only.
#[derive(Debug)]
pub struct BatchPlan {
    left: PathBuf,
    right: PathBuf,
    pub pairs: Vec<String>,
    pub new: Vec<String>,
    pub gone: Vec<String>,
}

impl BatchPlan {
    pub fn scan(left: &Path, right: &Path, filter: Option<&Pattern>) -> Result<Self> {
        for dir in [left, right] {
            if !dir.is_dir() {
                bail!("{} is not a directory", dir.display());
            }
        }

        let keep = |id: &String| filter.is_none_or(|p| p.matches(id));
        let left_ids: BTreeSet<String> = store::list_png_ids(left).into_iter().filter(keep).collect();
        let right_ids: BTreeSet<String> =
            store::list_png_ids(right).into_iter().filter(keep).collect();

        let plan = Self {
            left: left.to_path_buf(),
            right: right.to_path_buf(),
            pairs: left_ids.intersection(&right_ids).cloned().collect(),
            new: right_ids.difference(&left_ids).cloned().collect(),
            gone: left_ids.difference(&right_ids).cloned().collect(),
        };
        debug!(
            pairs = plan.pairs.len(),
            new = plan.new.len(),
            gone = plan.gone.len(),
            "batch planned"
        );
        Ok(plan)
    }

    pub fn total(&self) -> usize {
        self.pairs.len()
    }

    /// Compare every pair, at most `parallel` at a time.
    ///
    /// Returns a `Receiver` immediately; outcomes stream in as comparisons finish.
    pub fn execute(
        self,
        options: CompareOptions,
        max_ratio: f64,
        parallel: usize,
    ) -> mpsc::Receiver<(String, PairOutcome)> {
        let (tx, rx) = mpsc::channel(self.pairs.len().max(1));
        let permits = Arc::new(Semaphore::new(parallel.max(1)));
        let options = Arc::new(options);
        debug!(jobs = self.pairs.len(), parallel, "starting batch run");

        for id in self.pairs {
            let left = store::png_path(&self.left, &id);
            let right = store::png_path(&self.right, &id);
            let tx = tx.clone();
            let permits = Arc::clone(&permits);
            let options = Arc::clone(&options);

            tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                let outcome = tokio::task::spawn_blocking(move || {
                    compare_pair(&left, &right, &options, max_ratio)
                })
                .await
                .unwrap_or_else(|e| PairOutcome {
                    status: PairStatus::Error(format!("comparison task failed: {e}")),
                    diff_png: None,
                    elapsed: Duration::ZERO,
                });
                let _ = tx.send((id, outcome)).await;
            });
        }

        rx
    }
}

/// Reject an output directory equal to or inside either input directory.
pub fn ensure_output_outside(output: &Path, left: &Path, right: &Path) -> Result<()> {
    let out = resolve(output)?;
    for dir in [left, right] {
        let input = dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", dir.display()))?;
        if out.starts_with(&input) {
            bail!(
                "output directory {} must not be inside input directory {}",
                output.display(),
                dir.display()
            );
        }
    }
    Ok(())
}

/// Absolute form of `path` with symlinks resolved for the part that exists.
fn resolve(path: &Path) -> Result<PathBuf> {
    let path = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let mut existing = path.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return Ok(missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, name| acc.join(name)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(path.clone()),
        }
    }
}

/// Decode, compare and (on failure) encode one pair. Runs synchronously.
pub fn compare_pair(
    left: &Path,
    right: &Path,
    options: &CompareOptions,
    max_ratio: f64,
) -> PairOutcome {
    let start = Instant::now();
    let (status, diff_png) = match try_compare_pair(left, right, options, max_ratio) {
        Ok(result) => result,
        Err(e) => (PairStatus::Error(format!("{e:#}")), None),
    };
    PairOutcome {
        status,
        diff_png,
        elapsed: start.elapsed(),
    }
}

fn try_compare_pair(
    left: &Path,
    right: &Path,
    options: &CompareOptions,
    max_ratio: f64,
) -> Result<(PairStatus, Option<Vec<u8>>)> {
    let a = codec::load_png(left)?;
    let b = codec::load_png(right)?;

    match compare(&a, &b, options) {
        Err(CompareError::DimensionMismatch {
            width_a,
            height_a,
            width_b,
            height_b,
        }) => Ok((
            PairStatus::Fail {
                mismatched_pixels: 0,
                ratio: 1.0,
                dimension_mismatch: Some((width_a, height_a, width_b, height_b)),
            },
            None,
        )),
        Err(e) => Err(e.into()),
        Ok(c) if c.result.difference_ratio <= max_ratio => Ok((PairStatus::Pass, None)),
        Ok(c) => {
            let png = codec::encode_png(&c.diff_image)?;
            Ok((
                PairStatus::Fail {
                    mismatched_pixels: c.result.mismatched_pixels,
                    ratio: c.result.difference_ratio,
                    dimension_mismatch: None,
                },
                Some(png),
            ))
        }
    }
}
