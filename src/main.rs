use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use gridtable::core::pages::PageSelection;
use gridtable::parser::{is_pdf, PdfReader};
use gridtable::pipeline::{build_document, export_document, OutputFormat, PipelineConfig};
use gridtable::raster::{ImageFileRasterizer, PageRasterizer, PdfRasterizer};
use gridtable::{GridParams, TableDetector};

#[derive(Parser, Debug)]
#[command(name = "gridtable")]
#[command(version, about = "Recover table grids and merged cells from rendered document pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a PDF or page image to structured tables
    Convert {
        /// Input PDF or image file path
        input: PathBuf,

        /// Output directory (default: ./<input_name>_tables)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,

        /// Disable progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Convert multiple files
    Batch {
        /// Input PDF or image files
        inputs: Vec<PathBuf>,

        /// Output directory for all results
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Show information about a PDF file
    Info {
        /// Input PDF file path
        input: PathBuf,
    },

    /// Print detected grid lines and span flags for one page as JSON
    Detect {
        /// Input PDF or image file path
        input: PathBuf,

        /// 1-based page number (PDF input only)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rendering DPI for PDF input
        #[arg(long, default_value_t = 150)]
        dpi: u32,

        /// JSON file overriding detection parameters
        #[arg(long)]
        params: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Output format(s) to generate
    #[arg(short, long, value_enum, default_values_t = vec![Format::Html, Format::Json])]
    format: Vec<Format>,

    /// Rendering DPI; text is cropped in the same pixel space
    #[arg(long, default_value_t = 150)]
    dpi: u32,

    /// Page selection like 1-3,5 (default: all pages)
    #[arg(long)]
    pages: Option<String>,

    /// JSON file overriding detection parameters
    #[arg(long)]
    params: Option<PathBuf>,

    /// Write separator masks and an HTML overlay per page
    #[arg(short, long)]
    debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Format {
    Html,
    Json,
    Text,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => OutputFormat::Html,
            Format::Json => OutputFormat::Json,
            Format::Text => OutputFormat::Text,
        }
    }
}

fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridtable=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            run,
            quiet,
        } => convert_single(input, output, &run, quiet),
        Commands::Batch {
            inputs,
            output,
            run,
        } => convert_batch(inputs, output, &run),
        Commands::Info { input } => show_info(input),
        Commands::Detect {
            input,
            page,
            dpi,
            params,
        } => detect(input, page, dpi, params),
    }
}

fn load_params(path: Option<&Path>) -> Result<GridParams> {
    match path {
        Some(path) => GridParams::from_json_file(path)
            .with_context(|| format!("failed to load parameters from {}", path.display())),
        None => Ok(GridParams::default()),
    }
}

fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string())
}

fn build_config(input: PathBuf, output_dir: PathBuf, run: &RunArgs) -> Result<PipelineConfig> {
    let pages = run
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;
    let params = load_params(run.params.as_deref())?;

    Ok(PipelineConfig::new(input, output_dir, run.dpi)
        .with_pages(pages)
        .with_params(params)
        .with_formats(run.format.iter().copied().map(OutputFormat::from).collect())
        .with_debug(run.debug))
}

fn convert_single(input: PathBuf, output: Option<PathBuf>, run: &RunArgs, quiet: bool) -> Result<()> {
    // Validate input
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    let output_dir =
        output.unwrap_or_else(|| PathBuf::from(format!("{}_tables", input_stem(&input))));

    if !quiet {
        println!("[*] Processing: {}", input.display());
        println!("[*] Output: {}", output_dir.display());
        println!("[*] DPI: {}", run.dpi);
    }

    let config = build_config(input.clone(), output_dir.clone(), run)?;

    if !quiet {
        println!("\n[+] Detecting table grid...");
    }

    let document = build_document(&config)
        .with_context(|| format!("Failed to process: {}", input.display()))?;

    if !quiet {
        for table in &document.pages {
            println!(
                "    page {}: {} rows x {} cols, {} cell(s), {} warning(s)",
                table.page_idx + 1,
                table.grid.rows,
                table.grid.cols,
                table.cells.len(),
                table.warnings.len()
            );
        }
        println!("[+] Exporting results...");
    }

    export_document(&document, &config)
        .with_context(|| format!("Failed to export to: {}", output_dir.display()))?;

    if !quiet {
        println!("\n[✓] Done! Results saved to: {}", output_dir.display());
    }

    Ok(())
}

fn convert_batch(inputs: Vec<PathBuf>, output: Option<PathBuf>, run: &RunArgs) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }

    let base_output = output.unwrap_or_else(|| PathBuf::from("batch_tables"));

    println!("[*] Batch processing {} file(s)", inputs.len());
    println!("[*] Base output: {}\n", base_output.display());

    let mut success = 0;
    let mut failed = 0;

    for (i, input) in inputs.iter().enumerate() {
        println!("[{}/{}] Processing: {}", i + 1, inputs.len(), input.display());

        if !input.exists() {
            eprintln!("  [!] Skipped: file does not exist");
            failed += 1;
            continue;
        }

        let output_dir = base_output.join(input_stem(input));

        match convert_single(input.clone(), Some(output_dir), run, true) {
            Ok(()) => {
                println!("  [✓] Success");
                success += 1;
            }
            Err(e) => {
                eprintln!("  [✗] Failed: {e:#}");
                failed += 1;
            }
        }
        println!();
    }

    println!("\n[*] Summary: {success} succeeded, {failed} failed");

    if failed > 0 {
        anyhow::bail!("{failed} file(s) failed to process");
    }

    Ok(())
}

fn show_info(input: PathBuf) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let reader = PdfReader::new(input.clone())
        .with_context(|| format!("Failed to open PDF: {}", input.display()))?;

    let page_count = reader.page_count()?;

    println!("PDF Information");
    println!("===============");
    println!("File: {}", input.display());
    println!("Pages: {page_count}");

    Ok(())
}

fn detect(input: PathBuf, page: usize, dpi: u32, params: Option<PathBuf>) -> Result<()> {
    if page == 0 {
        anyhow::bail!("pages are 1-based");
    }
    let detector = TableDetector::new(load_params(params.as_deref())?)?;

    let rendered = if is_pdf(&input)? {
        let work_dir = std::env::temp_dir().join(format!("gridtable-detect-{}", std::process::id()));
        let rendered = PdfRasterizer::new(work_dir.clone(), dpi).render(&input, page - 1);
        let _ = std::fs::remove_dir_all(&work_dir);
        rendered?
    } else {
        ImageFileRasterizer::new().render(&input, page - 1)?
    };

    let analysis = detector.analyze(&rendered.image)?;
    println!("{}", serde_json::to_string_pretty(&analysis.report())?);
    Ok(())
}
