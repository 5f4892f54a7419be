use serde::{Deserialize, Serialize};

use super::validate_ratio;

fn parse_ratio(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    validate_ratio(v)
}

/// Configuration for directory comparisons.
///
/// Serves both TOML deserialization (`[batch]`) and CLI argument parsing.
#[derive(Clone, Debug, Default, PartialEq, clap::Args, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Number of image pairs compared concurrently
    #[arg(long, short = 'p')]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<usize>,

    /// Max difference ratio (0.0-1.0) for a pair to pass
    #[arg(long, value_parser = parse_ratio)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ratio: Option<f64>,
}

impl BatchConfig {
    /// Overlay non-None fields from `other` onto self.
    pub fn merge(&mut self, other: &BatchConfig) {
        if other.parallel.is_some() {
            self.parallel = other.parallel;
        }
        if other.max_ratio.is_some() {
            self.max_ratio = other.max_ratio;
        }
    }

    pub fn parallel(&self) -> usize {
        self.parallel.unwrap_or(4).max(1)
    }

    pub fn max_ratio(&self) -> f64 {
        self.max_ratio.unwrap_or(0.0)
    }
}
