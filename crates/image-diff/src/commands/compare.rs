use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use image_diff_core::{Comparator, CompareError, Comparison, PixelBuffer};
use tracing::{debug, info, warn};

use crate::codec;
use crate::config::ResolvedRunConfig;
use crate::report::{json, terminal};

fn open_in_viewer(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(target_os = "windows")]
    let cmd = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let cmd = "xdg-open";

    std::process::Command::new(cmd)
        .arg(path)
        .spawn()
        .context("Failed to open diff image")?;
    Ok(())
}

async fn decode(path: &Path) -> Result<PixelBuffer> {
    let path: PathBuf = path.to_path_buf();
    let buffer = tokio::task::spawn_blocking(move || codec::load_png(&path))
        .await
        .context("Decode task panicked")??;
    Ok(buffer)
}

/// `image-diff compare`: diff two PNGs and write the diff image.
/// Returns exit code: 0 = no mismatched pixels, 1 = differences found.
pub async fn compare(
    image1: &Path,
    image2: &Path,
    output: &Path,
    config: ResolvedRunConfig,
    open: bool,
    json_output: bool,
) -> Result<i32> {
    info!(
        image1 = %image1.display(),
        image2 = %image2.display(),
        "comparing images"
    );
    debug!(options = ?config.options, "resolved options");

    let (a, b) = tokio::try_join!(decode(image1), decode(image2))?;

    let options = config.options;
    let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let start = Instant::now();
    let Comparison { diff_image, result } =
        tokio::task::spawn_blocking(move || -> Result<Comparison, CompareError> {
            Comparator::new(&options)?.compare_parallel(&a, &b, workers)
        })
        .await
        .context("Diff task panicked")??;
    debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        workers, "diff computed"
    );

    let out = output.to_path_buf();
    tokio::task::spawn_blocking(move || codec::save_png(&diff_image, &out))
        .await
        .context("Encode task panicked")??;

    if json_output {
        json::print_result(&result, output)?;
    } else {
        terminal::print_result(&result, output);
    }

    if open {
        let path = std::fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf());
        if let Err(e) = open_in_viewer(&path) {
            warn!("{e:#}");
        }
    }

    Ok(if result.is_match() { 0 } else { 1 })
}
