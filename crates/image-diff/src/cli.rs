use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{BatchConfig, DiffConfig};

#[derive(Parser)]
#[command(
    name = "image-diff",
    version,
    about = "Perceptual pixel-level comparison of PNG images"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two PNG images and write a diff image (exit 0/1)
    Compare {
        /// Reference image
        image1: PathBuf,
        /// Image to compare against the reference
        image2: PathBuf,
        /// Where to write the diff image
        #[arg(long, short = 'o', default_value = "diff.png")]
        output: PathBuf,
        /// Open the diff image in the default viewer
        #[arg(long)]
        open: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        diff: DiffConfig,
    },

    /// Compare every PNG in LEFT with the same-named PNG in RIGHT (exit 0/1)
    Batch {
        /// Directory with reference images
        left: PathBuf,
        /// Directory with images to compare
        right: PathBuf,
        /// Directory for diff images of failed pairs
        #[arg(long, short = 'o', default_value = "diffs")]
        output: PathBuf,
        /// Only compare images whose relative path matches GLOB
        #[arg(long, short = 'f', value_name = "GLOB")]
        filter: Option<String>,
        #[command(flatten)]
        batch: BatchConfig,
        #[command(flatten)]
        diff: DiffConfig,
    },

    /// Create image-diff.toml with the available settings
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}
