pub mod batch;
pub mod diff;
pub mod resolve;
pub mod template;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::batch::BatchConfig;
pub use self::diff::DiffConfig;
pub use self::resolve::{CliOverrides, ResolvedRunConfig};
pub use self::template::write_template;

pub(crate) const CONFIG_FILE: &str = "image-diff.toml";
const CONFIG_ENV: &str = "IMAGE_DIFF_CONFIG";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub diff: DiffConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

pub fn validate_ratio(v: f64) -> Result<f64, String> {
    if !(0.0..=1.0).contains(&v) {
        return Err(format!("max_ratio must be between 0.0 and 1.0, got {v}"));
    }
    Ok(v)
}

/// `$IMAGE_DIFF_CONFIG`, or `image-diff.toml` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Load the config file. A missing file is not an error: every setting has a default.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    if let Some(ratio) = config.batch.max_ratio {
        validate_ratio(ratio).map_err(|e| anyhow!("batch.{e}"))?;
    }
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.diff, DiffConfig::default());
        assert_eq!(config.batch, BatchConfig::default());
    }

    #[test]
    fn loads_both_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "[diff]\nthreshold = 0.2\ndiff_mask = true\n\n[batch]\nparallel = 8\n",
        )
        .unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.diff.threshold, Some(0.2));
        assert_eq!(config.diff.diff_mask, Some(true));
        assert_eq!(config.batch.parallel(), 8);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[diff]\nthreshold = \"high\"\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILE));
    }

    #[test]
    fn unknown_section_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[viewport.laptop]\nwidth = 1366\n").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn out_of_range_ratio_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[batch]\nmax_ratio = 2.0\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().starts_with("batch.max_ratio"));
    }
}
