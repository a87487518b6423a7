//! Process command - extract records from a single document file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use formscan_core::export;
use formscan_core::models::{Extraction, Field, FormscanConfig};
use formscan_core::ocr::OcrAdapter;
use formscan_core::parser::{HeuristicParser, RecordParser};
use formscan_core::PureOcrEngine;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (image, or .txt with pre-recognized text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout; csv defaults to extracted_data.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Show extraction warnings
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Per-record field table
    Table,
    /// JSON output
    Json,
    /// CSV in the export column order
    Csv,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Acquiring text...");
    pb.set_position(20);

    let text = acquire_text(&args.input, args.model_dir.as_deref(), &config)?;

    pb.set_message("Extracting records...");
    pb.set_position(70);

    let parser = HeuristicParser::with_config(config.extraction.clone());
    let extraction = parser.parse(&text);

    pb.set_position(100);
    pb.finish_with_message("Done");

    if args.show_warnings && !extraction.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &extraction.warnings {
            eprintln!("  - {}", warning);
        }
    }

    if extraction.records.is_empty() {
        // Not a failure: the document just had nothing to extract.
        println!("{} No data extracted", style("ℹ").blue());
        return Ok(());
    }

    let output = format_extraction(&extraction, args.format, &config)?;

    let output_path = args.output.clone().or_else(|| match args.format {
        OutputFormat::Csv => Some(PathBuf::from(export::EXPORT_FILE_NAME)),
        _ => None,
    });

    if let Some(path) = output_path {
        fs::write(&path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<FormscanConfig> {
    Ok(if let Some(path) = config_path {
        FormscanConfig::from_file(Path::new(path))?
    } else {
        FormscanConfig::default()
    })
}

/// Acquire the raw text for a file: `.txt` passthrough, OCR for images.
pub(crate) fn acquire_text(
    input: &Path,
    model_dir: Option<&Path>,
    config: &FormscanConfig,
) -> anyhow::Result<String> {
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "txt" => Ok(fs::read_to_string(input)?),
        "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp" => {
            let image = image::open(input)?;
            run_ocr(&image, model_dir, config)
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Run OCR on an image using models from the configured directory.
fn run_ocr(
    image: &image::DynamicImage,
    model_dir: Option<&Path>,
    config: &FormscanConfig,
) -> anyhow::Result<String> {
    let model_dir = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.models.model_dir.clone());

    let det_model = model_dir.join(&config.models.detection_model);
    if !det_model.exists() {
        anyhow::bail!(
            "OCR models not found at {}. Place det.onnx, latin_rec.onnx and \
             latin_dict.txt there, or pass --model-dir.",
            model_dir.display()
        );
    }

    let engine = PureOcrEngine::from_dir(&model_dir, config.ocr.clone())
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))?;

    let text = engine
        .recognize(image, config.ocr.language)
        .map_err(|e| anyhow::anyhow!("Extraction failed for this image: {}", e))?;

    debug!("OCR produced {} characters", text.len());

    Ok(text)
}

pub(crate) fn format_extraction(
    extraction: &Extraction,
    format: OutputFormat,
    config: &FormscanConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&extraction.records)?),
        OutputFormat::Csv => Ok(export::csv_string(&extraction.records)?),
        OutputFormat::Table => Ok(format_table(extraction, config)),
    }
}

fn format_table(extraction: &Extraction, config: &FormscanConfig) -> String {
    let mut output = String::new();
    let threshold = config.extraction.low_confidence_threshold;

    for record in &extraction.records {
        output.push_str(&format!("{}\n", style(format!("Record {}", record.id)).bold()));

        if record.is_empty() {
            output.push_str(&format!("  {}\n", style("(no fields found)").dim()));
            continue;
        }

        for (field, value) in &record.fields {
            let marker = if value.confidence < threshold {
                format!(" {}", style("(low confidence)").yellow())
            } else {
                String::new()
            };
            output.push_str(&format!("  {:<14} {}{}\n", field.name(), value.value, marker));
        }

        let missing = Field::ALL.len() - record.fields.len();
        output.push_str(&format!(
            "  {}\n",
            style(format!("{} field(s) not found", missing)).dim()
        ));
    }

    output.push_str(&format!(
        "{} record(s) extracted from {} line(s)\n",
        extraction.records.len(),
        extraction.line_count
    ));

    output
}
