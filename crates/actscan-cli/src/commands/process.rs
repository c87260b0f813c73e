//! Process command - OCR screenshots and extract activity records.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use actscan_core::models::config::{ActscanConfig, OcrFailurePolicy};
use actscan_core::{
    create_engine_from_dir, ActivityRecord, AnalysisResponse, ImageStore, Ingestor, OcrPage,
};

use super::config::load_config;
use super::output::{format_csv, format_text, OutputFormat};
use super::upload::resolve_images;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Process every image stored for this user
    #[arg(short, long, conflicts_with = "input", required_unless_present = "input")]
    user: Option<String>,

    /// Image files or glob pattern to process instead of a stored user
    input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Leave images whose OCR fails out of the output
    #[arg(long)]
    skip_failed: bool,

    /// Write a per-image OCR summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let store = ImageStore::from_config(&config.storage);

    let images = match (&args.user, &args.input) {
        (Some(user), _) => match store.list_images(user) {
            Ok(images) => images,
            Err(e) => {
                if args.format == OutputFormat::Json {
                    let response = AnalysisResponse::failure(e.to_string());
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                return Err(e.into());
            }
        },
        (None, Some(pattern)) => resolve_images(&store, std::slice::from_ref(pattern))?,
        (None, None) => anyhow::bail!("Specify --user or an input pattern"),
    };

    let (pages, records) = if images.is_empty() {
        eprintln!("{} No images to process", style("ℹ").blue());
        (Vec::new(), Vec::new())
    } else {
        eprintln!(
            "{} Found {} images to process",
            style("ℹ").blue(),
            images.len()
        );
        run_pipeline(&args, &config, &images)?
    };
    info!("Assembled {} records", records.len());

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &pages)?;
    }

    let output = match args.format {
        OutputFormat::Json => match &args.user {
            Some(user) => serde_json::to_string_pretty(&AnalysisResponse::for_user(
                user.trim(),
                records,
            ))?,
            None => serde_json::to_string_pretty(&records)?,
        },
        OutputFormat::Csv => format_csv(&records)?,
        OutputFormat::Text => format_text(&records),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// OCR every image with a progress bar, then assemble the records.
fn run_pipeline(
    args: &ProcessArgs,
    config: &ActscanConfig,
    images: &[PathBuf],
) -> anyhow::Result<(Vec<OcrPage>, Vec<ActivityRecord>)> {
    let model_dir = args
        .model_dir
        .clone()
        .unwrap_or_else(|| config.models.model_dir.clone());

    let engine = create_engine_from_dir(&model_dir, &config.models, config.ocr.clone()).map_err(|e| {
        anyhow::anyhow!(
            "{}. Place {}, {} and {} in {} or pass --model-dir.",
            e,
            config.models.detection_model,
            config.models.recognition_model,
            config.models.dictionary,
            model_dir.display()
        )
    })?;

    let policy = if args.skip_failed {
        OcrFailurePolicy::Skip
    } else {
        config.ingest.on_ocr_failure
    };
    let ingestor = Ingestor::new(engine).with_failure_policy(policy);

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let mut pages = Vec::with_capacity(images.len());
    for path in images {
        pb.set_message(display_name(path));
        if let Some(page) = ingestor.ocr_page(path) {
            pages.push(page);
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    let records = ingestor.assemble(&pages);
    Ok((pages, records))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_summary(path: &Path, pages: &[OcrPage]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["file", "status", "confidence", "characters"])?;

    for page in pages {
        let status = if page.failed { "error" } else { "success" };
        let confidence = page
            .confidence
            .map(|c| format!("{:.2}", c))
            .unwrap_or_default();
        let characters = page.text.chars().count().to_string();

        wtr.write_record([
            page.file.as_str(),
            status,
            confidence.as_str(),
            characters.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
