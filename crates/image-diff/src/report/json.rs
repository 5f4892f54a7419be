use std::path::Path;

use anyhow::{Context, Result};
use image_diff_core::CompareResult;
use serde::Serialize;

/// Machine-readable result of `image-diff compare --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReport<'a> {
    #[serde(flatten)]
    pub result: &'a CompareResult,
    pub output: &'a Path,
}

pub fn render(result: &CompareResult, output: &Path) -> Result<String> {
    serde_json::to_string_pretty(&CompareReport { result, output })
        .context("Failed to serialize result")
}

pub fn print_result(result: &CompareResult, output: &Path) -> Result<()> {
    println!("{}", render(result, output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_camel_case() {
        let result = CompareResult {
            mismatched_pixels: 400,
            total_pixels: 10_000,
            difference_ratio: 0.04,
        };
        let json = render(&result, Path::new("out/diff.png")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mismatchedPixels"], 400);
        assert_eq!(value["totalPixels"], 10_000);
        assert_eq!(value["differenceRatio"], 0.04);
        assert_eq!(value["output"], "out/diff.png");
    }
}
