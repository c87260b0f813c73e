//! CLI application for fitness activity screenshot OCR.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{config, extract, list, process, remove, upload};

/// Activity screenshot OCR - Extract activity summaries from fitness app screenshots
#[derive(Parser)]
#[command(name = "actscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract activity fields from OCR text
    Extract(extract::ExtractArgs),

    /// Store screenshots for a user
    Upload(upload::UploadArgs),

    /// OCR screenshots and extract activity records
    Process(process::ProcessArgs),

    /// List stored users or a user's images
    List(list::ListArgs),

    /// Delete a user's stored images
    Remove(remove::RemoveArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    // Logs go to stderr so stdout stays machine-readable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args).await,
        Commands::Upload(args) => upload::run(args, config_path).await,
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::List(args) => list::run(args, config_path).await,
        Commands::Remove(args) => remove::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
