//! List command - show stored users and their images.

use clap::Args;
use console::style;

use actscan_core::ImageStore;

use super::config::load_config;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Only list this user's images
    #[arg(short, long)]
    user: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ListArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = ImageStore::from_config(&config.storage);

    match args.user {
        Some(user) => {
            let names: Vec<String> = store
                .list_images(&user)?
                .iter()
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect();

            if args.json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else if names.is_empty() {
                println!("{} No images for user {}", style("ℹ").blue(), user.trim());
            } else {
                for name in &names {
                    println!("{}", name);
                }
            }
        }
        None => {
            let users = store.list_users()?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else if users.is_empty() {
                println!(
                    "{} No users in {}",
                    style("ℹ").blue(),
                    store.root().display()
                );
            } else {
                println!("{}", style("Users:").bold());
                for user in &users {
                    println!("  {:<24} {} images", user.user_id, user.images);
                }
            }
        }
    }

    Ok(())
}
