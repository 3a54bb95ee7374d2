//! Process command - extract data from a single OCR text dump.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use invex_core::models::config::PipelineConfig;
use invex_core::ocr::confidence;
use invex_core::{FilenameHint, InvoicePipeline, InvoiceRecord, PipelineOutput, ValidationReport};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (recognized text dump)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the validation report to stderr
    #[arg(long)]
    validate: bool,

    /// Show the heuristic text quality score
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (record plus validation)
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// JSON hand-off shape: the record plus its advisory validation.
#[derive(Serialize)]
struct ProcessReport<'a> {
    record: &'a InvoiceRecord,
    validation: &'a ValidationReport,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        PipelineConfig::from_file(std::path::Path::new(path))?
    } else {
        PipelineConfig::default()
    };

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let text = fs::read_to_string(&args.input)?;
    if text.trim().is_empty() {
        anyhow::bail!("No text in input file");
    }

    let hint = FilenameHint::parse(&args.input);
    if let Some(hint) = &hint {
        debug!("filename hint: {}", hint.canonical());
    }

    let pipeline = InvoicePipeline::from_config(&config);
    let result = pipeline.process_text(&text, hint.as_ref(), None);

    // Surface the validation report if requested
    if args.validate {
        print_validation(&result.validation);
    }

    // Format output
    let output = format_output(&result, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!(
            "{} Text quality score: {:.2}",
            style("ℹ").blue(),
            confidence::score(&text)
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_validation(validation: &ValidationReport) {
    if validation.is_valid && validation.warnings.is_empty() {
        eprintln!("{} Record is valid", style("✓").green());
        return;
    }

    if !validation.missing_fields.is_empty() {
        eprintln!("{}", style("Missing required fields:").yellow());
        for field in &validation.missing_fields {
            eprintln!("  - {}", field);
        }
    }

    for warning in &validation.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }
}

pub fn format_output(result: &PipelineOutput, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let report = ProcessReport {
                record: &result.record,
                validation: &result.validation,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Csv => format_csv(&result.record, &result.validation),
        OutputFormat::Text => Ok(format_text(&result.record, &result.validation)),
    }
}

fn format_csv(record: &InvoiceRecord, validation: &ValidationReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_number",
        "issue_date",
        "client_name",
        "email",
        "address",
        "item_count",
        "total",
        "is_valid",
    ])?;

    wtr.write_record([
        record.invoice_number.as_deref().unwrap_or(""),
        &record
            .issue_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        record.client_name.as_deref().unwrap_or(""),
        record.email.as_deref().unwrap_or(""),
        record.address.as_deref().unwrap_or(""),
        &record.items.len().to_string(),
        &record.total.map(|t| format!("{t:.2}")).unwrap_or_default(),
        &validation.is_valid.to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord, validation: &ValidationReport) -> String {
    let mut output = String::new();

    let or_missing = |v: Option<&str>| v.unwrap_or("-").to_string();

    output.push_str(&format!(
        "Invoice: {}\n",
        or_missing(record.invoice_number.as_deref())
    ));
    output.push_str(&format!(
        "Date:    {}\n",
        record
            .issue_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!(
        "Client:  {}\n",
        or_missing(record.client_name.as_deref())
    ));
    output.push_str(&format!("Email:   {}\n", or_missing(record.email.as_deref())));
    output.push_str(&format!(
        "Address: {}\n",
        or_missing(record.address.as_deref())
    ));

    output.push_str("\nItems:\n");
    if record.items.is_empty() {
        output.push_str("  (none)\n");
    } else {
        for item in &record.items {
            output.push_str(&format!(
                "  {} - {} x {:.2} = {:.2}\n",
                item.name, item.quantity, item.unit_price, item.total_price
            ));
        }
    }

    output.push_str(&format!(
        "\nTotal: {}\n",
        record
            .total
            .map(|t| format!("{t:.2}"))
            .unwrap_or_else(|| "-".to_string())
    ));

    if !validation.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &validation.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
