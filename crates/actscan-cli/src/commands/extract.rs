//! Extract command - pull activity fields out of OCR text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use actscan_core::{ActivityExtractor, ActivityRecord, ExtractionError, Field, RuleExtractor};

use super::output::{format_csv, format_text, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR text file ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Image identifier for the record (default: input file name)
    #[arg(long)]
    file_id: Option<String>,

    /// Show which rule matched each field
    #[arg(long)]
    explain: bool,
}

pub async fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let (bytes, source) = match &args.input {
        Some(path) if path.as_os_str() != "-" => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            (fs::read(path)?, name)
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            (buf, "stdin".to_string())
        }
    };

    let text = String::from_utf8(bytes).map_err(|e| {
        ExtractionError::InvalidInput(format!("OCR text is not valid UTF-8: {}", e.utf8_error()))
    })?;

    let extractor = RuleExtractor::new();
    let fields = extractor.extract(&text);

    info!("Extracted {} fields from {}", fields.present().count(), source);

    if args.explain {
        explain(&extractor, &text);
    }

    let record = ActivityRecord::new(args.file_id.unwrap_or(source), text, fields);
    let records = [record];

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&records[0])?,
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

    Ok(())
}

fn explain(extractor: &RuleExtractor, text: &str) {
    let result = extractor.extract_detailed(text);

    eprintln!("{}", style("Field matches:").bold());
    for field in Field::ALL {
        match result.matches.iter().find(|m| m.field == field) {
            Some(m) => eprintln!(
                "  {:<14} {:<24} {} @ {}..{}",
                field.label(),
                m.value,
                style(&m.rule).cyan(),
                m.position.0,
                m.position.1
            ),
            None => eprintln!("  {:<14} {}", field.label(), style("-").dim()),
        }
    }
    eprintln!(
        "{} {} of {} fields in {}ms",
        style("ℹ").blue(),
        result.matches.len(),
        Field::ALL.len(),
        result.processing_time_ms
    );
}
