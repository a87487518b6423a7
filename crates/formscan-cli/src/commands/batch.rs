//! Batch processing command for multiple document files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use csv::{QuoteStyle, WriterBuilder};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use formscan_core::models::{Extraction, Field};
use formscan_core::parser::{HeuristicParser, RecordParser};

use super::process::{acquire_text, format_extraction, load_config, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Also generate a summary CSV with one row per record
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    extraction: Option<Extraction>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "txt" | "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let parser = HeuristicParser::with_config(config.extraction.clone());
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        match acquire_text(&path, args.model_dir.as_deref(), &config) {
            Ok(text) => {
                let extraction = parser.parse(&text);
                debug!(
                    "{}: {} record(s) from {} line(s)",
                    path.display(),
                    extraction.records.len(),
                    extraction.line_count
                );
                results.push(FileResult {
                    path,
                    extraction: Some(extraction),
                    error: None,
                });
            }
            Err(e) => {
                let message = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), message);
                    results.push(FileResult {
                        path,
                        extraction: None,
                        error: Some(message),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), message);
                    anyhow::bail!("Processing failed: {}", message);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let successful: Vec<&FileResult> = results.iter().filter(|r| r.extraction.is_some()).collect();
    let failed: Vec<&FileResult> = results.iter().filter(|r| r.error.is_some()).collect();

    // Per-file outputs
    for result in &successful {
        let Some(extraction) = &result.extraction else {
            continue;
        };
        let Some(output_dir) = &args.output_dir else {
            continue;
        };
        if extraction.records.is_empty() {
            // Nothing to export for this file
            continue;
        }

        let output_name = result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");

        let extension = match args.format {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Table => "txt",
        };

        let output_path = output_dir.join(format!("{}.{}", output_name, extension));
        let content = format_extraction(extraction, args.format, &config)?;

        fs::write(&output_path, content)?;
        debug!("Wrote output to {}", output_path.display());
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// One row per extracted record: source file, record id, then the full
/// vocabulary in column order.
fn write_summary(path: &PathBuf, results: &[FileResult]) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)?;

    let mut header = vec!["FILE".to_string(), "RECORD ID".to_string()];
    header.extend(Field::ALL.iter().map(|f| f.name().to_string()));
    writer.write_record(&header)?;

    for result in results {
        let Some(extraction) = &result.extraction else {
            continue;
        };
        for record in &extraction.records {
            let mut row = vec![
                result.path.display().to_string(),
                record.id.to_string(),
            ];
            row.extend(
                Field::ALL
                    .iter()
                    .map(|f| record.value(*f).unwrap_or("").to_string()),
            );
            writer.write_record(&row)?;
        }
    }

    writer.flush()?;
    Ok(())
}
