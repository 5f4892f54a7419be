use std::io::Write;
use std::path::Path;
use std::time::Duration;

use image_diff_core::CompareResult;

use crate::batch::PairStatus;

/// Clear the current terminal line (wipes progress indicator).
pub fn clear_line() {
    print!("\r\x1b[2K");
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// `0.0123` -> `"1.23%"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Print the outcome of a single `image-diff compare`.
pub fn print_result(result: &CompareResult, output: &Path) {
    println!("Comparison complete!");
    println!(
        "  Pixels different: {} of {}",
        result.mismatched_pixels, result.total_pixels
    );
    println!(
        "  Difference ratio: {}",
        format_ratio(result.difference_ratio)
    );
    println!("  Diff image saved: {}", output.display());
    if result.is_match() {
        println!("  \x1b[32mImages match\x1b[0m");
    } else {
        println!("  \x1b[31mImages differ\x1b[0m");
    }
}

/// Print a single pair result line.
pub fn print_line(name: &str, status: &PairStatus, elapsed: Duration) {
    clear_line();
    let time_suffix = format!("  \x1b[2m{}\x1b[0m", format_duration(elapsed));

    match status {
        PairStatus::Pass => {
            println!("  \x1b[32mPASS\x1b[0m  {name}{time_suffix}");
        }
        PairStatus::Fail {
            mismatched_pixels,
            ratio,
            dimension_mismatch,
        } => {
            if let Some((lw, lh, rw, rh)) = dimension_mismatch {
                println!(
                    "  \x1b[31mFAIL\x1b[0m  {name}  (dimensions changed: {lw}x{lh} -> {rw}x{rh}){time_suffix}"
                );
            } else {
                println!(
                    "  \x1b[31mFAIL\x1b[0m  {name}  ({mismatched_pixels} pixels, {}){time_suffix}",
                    format_ratio(*ratio)
                );
            }
        }
        PairStatus::New => {
            println!("  \x1b[33m NEW\x1b[0m  {name}  (only in right directory)");
        }
        PairStatus::Error(msg) => {
            println!("  \x1b[31m ERR\x1b[0m  {name}  ({msg}){time_suffix}");
        }
    }
}

/// Print a line for an image that only exists in the left directory.
pub fn print_gone_line(name: &str) {
    clear_line();
    println!("  \x1b[2mGONE\x1b[0m  \x1b[2m{name}  (only in left directory)\x1b[0m");
}

/// Show comparison progress indicator.
pub fn show_progress(done: usize, total: usize) {
    if done < total {
        print!("  Comparing  [{done}/{total}]");
        let _ = std::io::stdout().flush();
    }
}

/// Print an actionable summary listing image ids grouped by status.
/// Only prints sections with at least one entry.
pub fn print_actionable_summary(
    failed: &[String],
    new: &[String],
    errored: &[String],
    gone: &[String],
) {
    if failed.is_empty() && new.is_empty() && errored.is_empty() && gone.is_empty() {
        return;
    }

    clear_line();
    println!();
    println!("Actionable images:");

    for (label, names) in [
        ("Failed", failed),
        ("New", new),
        ("Errored", errored),
        ("Gone", gone),
    ] {
        if !names.is_empty() {
            println!();
            println!("  {label} ({}):", names.len());
            for name in names {
                println!("    {name}");
            }
        }
    }
}

/// Tallies for the final batch summary.
#[derive(Debug, Default)]
pub struct BatchCounts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub new: usize,
    pub errored: usize,
    pub gone: usize,
}

impl BatchCounts {
    pub fn record(&mut self, status: &PairStatus) {
        match status {
            PairStatus::Pass => self.passed += 1,
            PairStatus::Fail { .. } => self.failed += 1,
            PairStatus::New => self.new += 1,
            PairStatus::Error(_) => self.errored += 1,
        }
    }

    /// Images that exist on one side only do not count as failures,
    /// except for new ones which have nothing to be checked against.
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 || self.new > 0 || self.errored > 0 {
            1
        } else {
            0
        }
    }
}

/// Print the final summary.
pub fn print_summary(counts: &BatchCounts, output: &Path, elapsed: Duration) {
    let BatchCounts {
        total,
        passed,
        failed,
        new,
        errored,
        gone,
    } = *counts;

    clear_line();
    println!();
    print!(
        "Images:  {total} compared, \x1b[32m{passed} passed\x1b[0m, \x1b[31m{failed} failed\x1b[0m, \x1b[33m{new} new\x1b[0m"
    );
    if errored > 0 {
        print!(", \x1b[31m{errored} errored\x1b[0m");
    }
    if gone > 0 {
        print!(", \x1b[2m{gone} gone\x1b[0m");
    }
    println!();
    println!("Time:    {}", format_duration(elapsed));

    if failed > 0 || new > 0 || errored > 0 || gone > 0 {
        println!();
        if failed > 0 {
            println!(
                "{failed} image(s) have visual differences. Diffs written to {}",
                output.display()
            );
        }
        if new > 0 {
            println!("{new} image(s) have no counterpart in the left directory.");
        }
        if errored > 0 {
            println!("{errored} image(s) could not be compared.");
        }
        if gone > 0 {
            println!("{gone} image(s) have no counterpart in the right directory.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_switch_to_seconds() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
    }

    #[test]
    fn ratio_is_percentage() {
        assert_eq!(format_ratio(0.04), "4.00%");
        assert_eq!(format_ratio(0.0), "0.00%");
        assert_eq!(format_ratio(1.0), "100.00%");
    }

    #[test]
    fn counts_by_status() {
        let mut counts = BatchCounts::default();
        counts.record(&PairStatus::Pass);
        counts.record(&PairStatus::Pass);
        counts.record(&PairStatus::Error("boom".into()));
        assert_eq!((counts.passed, counts.errored), (2, 1));
        assert_eq!(counts.exit_code(), 1);
    }

    #[test]
    fn gone_alone_does_not_fail() {
        let counts = BatchCounts {
            total: 3,
            passed: 3,
            gone: 2,
            ..Default::default()
        };
        assert_eq!(counts.exit_code(), 0);
    }

    #[test]
    fn new_fails_the_run() {
        let mut counts = BatchCounts::default();
        counts.record(&PairStatus::New);
        assert_eq!(counts.exit_code(), 1);
    }
}
