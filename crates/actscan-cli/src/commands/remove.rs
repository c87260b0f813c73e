//! Remove command - delete a user's stored images.

use clap::Args;
use console::style;

use actscan_core::ImageStore;

use super::config::load_config;

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// User whose images are deleted
    #[arg(short, long)]
    user: String,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

pub async fn run(args: RemoveArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = ImageStore::from_config(&config.storage);

    if !args.yes {
        println!(
            "{} This deletes {}. Re-run with --yes to confirm.",
            style("⚠").yellow(),
            store.user_dir(&args.user)?.display()
        );
        return Ok(());
    }

    let removed = store.remove_user(&args.user)?;

    println!(
        "{} Removed {} images for user {}",
        style("✓").green(),
        removed,
        args.user.trim()
    );

    Ok(())
}
