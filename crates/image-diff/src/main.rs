mod batch;
mod cli;
mod codec;
mod commands;
mod config;
mod report;
mod store;

use clap::Parser;
use config::{CliOverrides, ResolvedRunConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("image_diff=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Init { force } => {
            commands::init(force)?;
        }
        cli::Command::Compare {
            image1,
            image2,
            output,
            open,
            json,
            diff,
        } => {
            let overrides = CliOverrides {
                diff,
                ..Default::default()
            };
            let config = ResolvedRunConfig::new(overrides)?;
            let code = commands::compare(&image1, &image2, &output, config, open, json).await?;
            std::process::exit(code);
        }
        cli::Command::Batch {
            left,
            right,
            output,
            filter,
            batch,
            diff,
        } => {
            let config = ResolvedRunConfig::new(CliOverrides { diff, batch })?;
            let code =
                commands::batch(&left, &right, &output, filter.as_deref(), config).await?;
            std::process::exit(code);
        }
    }

    Ok(())
}
