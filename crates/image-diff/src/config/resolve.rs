use anyhow::{Context, Result};
use image_diff_core::CompareOptions;

use super::{BatchConfig, Config, DiffConfig, config_path, load};

const THRESHOLD_ENV: &str = "IMAGE_DIFF_THRESHOLD";

/// Values extracted from the CLI that participate in the merge.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub diff: DiffConfig,
    pub batch: BatchConfig,
}

/// Fully resolved config after CLI > env > file > defaults merge.
#[derive(Debug)]
pub struct ResolvedRunConfig {
    pub options: CompareOptions,
    pub batch: BatchConfig,
}

impl ResolvedRunConfig {
    pub fn new(cli: CliOverrides) -> Result<Self> {
        // 1. File layer
        let file_config = load(&config_path())?;

        // 2. Env layer
        let env_threshold: Option<f64> = std::env::var(THRESHOLD_ENV)
            .ok()
            .map(|v| v.parse::<f64>())
            .transpose()
            .with_context(|| format!("{THRESHOLD_ENV} must be a valid float"))?;

        Self::from_layers(file_config, env_threshold, cli)
    }

    /// Merge already-loaded layers, highest priority last.
    pub fn from_layers(
        file_config: Config,
        env_threshold: Option<f64>,
        cli: CliOverrides,
    ) -> Result<Self> {
        let mut diff = file_config.diff;
        diff.merge(&DiffConfig {
            threshold: env_threshold,
            ..Default::default()
        });
        diff.merge(&cli.diff);
        let options = diff.to_options()?;

        let mut batch = file_config.batch;
        batch.merge(&cli.batch);

        Ok(Self { options, batch })
    }
}
