//! CLI binary for file2table.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints the extracted table.

use anyhow::{Context, Result};
use clap::Parser;
use file2table::{
    extract, CellValue, ExtractionConfig, ExtractionProgressCallback, ExtractionResult, SourceFile,
    SourceFormat,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner that relays the OCR engine's own
/// progress messages as they arrive. Workbook extractions finish too fast
/// to need one, so the spinner only reacts to engine events.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, format: SourceFormat) {
        self.bar.set_message(format.to_string());
    }

    fn on_engine_event(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn on_extraction_complete(&self, rows: usize, columns: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} extracted {} rows × {} columns",
            green("✔"),
            bold(&rows.to_string()),
            bold(&columns.to_string()),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract a scanned receipt (requires --features tesseract at build time)
  file2table receipt.png

  # Extract a workbook, all sheets merged into one table
  file2table budget.xlsx

  # JSON output for piping
  file2table budget.xlsx --json | jq '.rows[0]'

  # Number rows 0..n across all sheets instead of per sheet
  file2table budget.xlsx --global-row-ids

  # Restrict OCR to English and give the engine more time
  file2table scan.jpg --ocr-lang eng --ocr-timeout 300

  # Override the media type when the extension lies
  file2table export.bin --media-type application/vnd.ms-excel

SUPPORTED INPUTS:
  Images        png jpg jpeg gif bmp webp tif tiff   (OCR branch)
  Spreadsheets  xlsx xlsm xls ods                    (workbook branch)

  csv is declared as text/csv and is NOT dispatched — convert it to a
  workbook first.

OCR NOTES:
  The default build has no OCR engine: image inputs fail with a hint.
  Build with `--features tesseract` to bind the system Tesseract
  installation (requires libtesseract, libleptonica, and traineddata for
  every language in --ocr-lang).
"#;

/// Extract a normalized table from an image (via OCR) or a spreadsheet.
#[derive(Parser, Debug)]
#[command(
    name = "file2table",
    version,
    about = "Extract a normalized table from an image (via OCR) or a spreadsheet workbook",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file (image or workbook).
    input: PathBuf,

    /// Override the media type instead of inferring it from the extension.
    #[arg(long, env = "FILE2TABLE_MEDIA_TYPE")]
    media_type: Option<String>,

    /// Output structured JSON (rows + columns) instead of an aligned table.
    #[arg(long, env = "FILE2TABLE_JSON")]
    json: bool,

    /// OCR language spec, `+`-joined Tesseract codes.
    #[arg(long, env = "FILE2TABLE_OCR_LANG", default_value = file2table::DEFAULT_OCR_LANGUAGES)]
    ocr_lang: String,

    /// OCR call timeout in seconds (0 = wait indefinitely).
    #[arg(long, env = "FILE2TABLE_OCR_TIMEOUT", default_value_t = 60)]
    ocr_timeout: u64,

    /// Number rows 0..n across all sheets instead of restarting per sheet.
    #[arg(long, env = "FILE2TABLE_GLOBAL_ROW_IDS")]
    global_row_ids: bool,

    /// Tessdata directory override (tesseract builds only).
    #[arg(long, env = "FILE2TABLE_TESSDATA")]
    tessdata: Option<String>,

    /// Disable the progress spinner.
    #[arg(long, env = "FILE2TABLE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FILE2TABLE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the table itself.
    #[arg(short, long, env = "FILE2TABLE_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ExtractionConfig::builder()
        .ocr_languages(&cli.ocr_lang)
        .per_sheet_ids(!cli.global_row_ids);

    builder = if cli.ocr_timeout == 0 {
        builder.no_ocr_timeout()
    } else {
        builder.ocr_timeout_secs(cli.ocr_timeout)
    };

    if let Some(engine) = build_engine(&cli) {
        builder = builder.engine(engine);
    }

    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new());
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Extract ──────────────────────────────────────────────────────────
    let result = match cli.media_type {
        Some(ref media_type) => {
            let bytes = tokio::fs::read(&cli.input)
                .await
                .with_context(|| format!("Failed to read '{}'", cli.input.display()))?;
            extract(&SourceFile::new(bytes, media_type.clone()), &config).await
        }
        None => file2table::extract_path(&cli.input, &config).await,
    }
    .context("Extraction failed")?;

    // ── Print ────────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        print_table(&result)?;
    }

    Ok(())
}

/// The OCR engine this build carries, if any.
fn build_engine(cli: &Cli) -> Option<Arc<dyn file2table::OcrEngine>> {
    #[cfg(feature = "tesseract")]
    {
        Some(Arc::new(
            file2table::engine::tesseract::TesseractEngine::new(cli.tessdata.clone()),
        ))
    }
    #[cfg(not(feature = "tesseract"))]
    {
        let _ = &cli.tessdata;
        None
    }
}

/// Print the result as an aligned text table: one header line, one line per
/// row, cells resolved through the column accessors.
fn print_table(result: &ExtractionResult) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if result.is_empty() {
        writeln!(out, "{}", dim("(empty result)"))?;
        return Ok(());
    }

    // Column widths from the widest of header and cells.
    let widths: Vec<usize> = result
        .columns
        .iter()
        .map(|col| {
            let cells = result
                .rows
                .iter()
                .map(|r| cell_text(r.get(&col.accessor)).chars().count())
                .max()
                .unwrap_or(0);
            col.header.chars().count().max(cells)
        })
        .collect();

    let header: Vec<String> = result
        .columns
        .iter()
        .zip(widths.iter().copied())
        .map(|(col, w)| format!("{:<w$}", col.header))
        .collect();
    writeln!(out, "{}", bold(&header.join("  ")))?;

    for row in &result.rows {
        let line: Vec<String> = result
            .columns
            .iter()
            .zip(widths.iter().copied())
            .map(|(col, w)| format!("{:<w$}", cell_text(row.get(&col.accessor))))
            .collect();
        writeln!(out, "{}", line.join("  "))?;
    }

    Ok(())
}

fn cell_text(value: Option<CellValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
