use anyhow::{Result, bail};

use crate::config;

/// `image-diff init`: write a commented config template.
pub fn init(force: bool) -> Result<()> {
    let path = config::config_path();
    if !config::write_template(&path, force)? {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let verb = if force { "Regenerated" } else { "Created" };
    println!("{verb} {}", path.display());
    Ok(())
}
