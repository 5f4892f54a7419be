use std::path::Path;

use anyhow::{Context, Result};

/// Hand-crafted config template with commented-out keys.
/// Used by `image-diff init` instead of `toml::to_string_pretty()` so that
/// users can see the available knobs and their defaults.
const CONFIG_TEMPLATE: &str = r#"# ─────────────────────────────────────────────────────────
# Comparison: all fields optional. CLI flags override these.
# ─────────────────────────────────────────────────────────
[diff]
# threshold = 0.1                  # 0 = most sensitive, 1 = least
# include_aa = false               # count anti-aliased pixels as differences
# alpha = 1.0                      # opacity of unchanged pixels in the diff image
# aa_color = [255, 255, 0]         # color of anti-aliased pixels
# diff_color = [255, 0, 0]         # color of different pixels
# diff_color_alt = [0, 255, 0]     # color of pixels that got darker
# diff_mask = false                # transparent background instead of faded image

# ─────────────────────────────────────────────────────────
# Directory comparisons (`image-diff batch`).
# ─────────────────────────────────────────────────────────
[batch]
# parallel = 4                     # image pairs compared concurrently
# max_ratio = 0.0                  # max difference ratio for a pair to pass
"#;

/// Write the config template. Refuses to overwrite unless `force`.
pub fn write_template(path: &Path, force: bool) -> Result<bool> {
    if !force && path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
