//! Upload command - import screenshots into a user's image directory.

use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use tracing::warn;

use actscan_core::ImageStore;

use super::config::load_config;

/// Arguments for the upload command.
#[derive(Args)]
pub struct UploadArgs {
    /// User the images belong to
    #[arg(short, long)]
    user: String,

    /// Image files or glob patterns (e.g., "shots/*.png")
    #[arg(required = true)]
    inputs: Vec<String>,
}

pub async fn run(args: UploadArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = ImageStore::from_config(&config.storage);

    let files = resolve_images(&store, &args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No image files found for: {}", args.inputs.join(" "));
    }

    let mut saved = Vec::with_capacity(files.len());
    for path in &files {
        saved.push(store.import(&args.user, path)?);
    }

    for path in &saved {
        println!("  {}", path.display());
    }
    println!(
        "{} Saved {} images for user {}",
        style("✓").green(),
        saved.len(),
        args.user.trim()
    );

    Ok(())
}

/// Expand glob patterns, keeping files with an image extension.
pub fn resolve_images(store: &ImageStore, inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        for path in glob(input)?.filter_map(|r| r.ok()) {
            if !path.is_file() {
                continue;
            }
            if store.is_image(&path) {
                files.push(path);
            } else {
                warn!("Skipping non-image file {}", path.display());
            }
        }
    }

    Ok(files)
}
