mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use pdfclip_core::config::{self, ToolConfig};
use pdfclip_core::error::PdfClipError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::extract::{parse_quad, parse_size, ExtractArgs};

#[derive(Parser)]
#[command(
    name = "pdfclip",
    version,
    about = "Extract text from a fixed region on the first page of many PDFs"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). Without it RUST_LOG
    /// applies, defaulting to warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file (tool paths, preview DPI, degenerate region policy)
    #[arg(long, global = true, env = "PDFCLIP_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the pdftotext binary
    #[arg(long, global = true, env = "PDFCLIP_PDFTOTEXT", value_name = "PATH")]
    pdftotext: Option<PathBuf>,

    /// Path to the pdftoppm binary
    #[arg(long, global = true, env = "PDFCLIP_PDFTOPPM", value_name = "PATH")]
    pdftoppm: Option<PathBuf>,

    /// Preview rendering resolution (default 144, i.e. 2 px per pt)
    #[arg(
        long,
        global = true,
        env = "PDFCLIP_DPI",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    dpi: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the size of the first page in points
    Info {
        /// Path to PDF file
        input_file: PathBuf,
    },
    /// Render the first page to PNG, for drawing a region on
    Preview {
        /// Path to PDF file
        input_file: PathBuf,

        /// Where to write the PNG
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: PathBuf,
    },
    /// Extract one region from the first page of every PDF
    Extract {
        /// PDF files, processed in the given order
        #[arg(required = true)]
        input_files: Vec<PathBuf>,

        /// Region in points, origin top-left
        #[arg(
            long,
            value_name = "X1,Y1,X2,Y2",
            value_parser = parse_quad,
            allow_hyphen_values = true,
            conflicts_with = "canvas",
            required_unless_present = "canvas"
        )]
        region: Option<[f64; 4]>,

        /// Rectangle in preview pixels, drawn on the first document's preview
        #[arg(long, value_name = "LEFT,TOP,WIDTH,HEIGHT", value_parser = parse_quad)]
        canvas: Option<[f64; 4]>,

        /// Pixel size of the preview the canvas rectangle was drawn on.
        /// Rendered with pdftoppm when omitted.
        #[arg(long, value_name = "WxH", value_parser = parse_size, requires = "canvas")]
        preview_size: Option<(u32, u32)>,

        /// Refuse regions with zero width or height
        #[arg(long)]
        reject_degenerate: bool,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the results as CSV to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = tool_config(&cli).and_then(|tools| match cli.command {
        Commands::Info { input_file } => commands::info::run(input_file, &tools),
        Commands::Preview { input_file, out } => commands::preview::run(input_file, out, &tools),
        Commands::Extract {
            input_files,
            region,
            canvas,
            preview_size,
            reject_degenerate,
            output,
            out,
        } => commands::extract::run(
            ExtractArgs {
                input_files,
                region,
                canvas,
                preview_size,
                reject_degenerate,
                output_format: output,
                out,
            },
            &tools,
        ),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file first, then explicit flags and environment on top.
fn tool_config(cli: &Cli) -> Result<ToolConfig, PdfClipError> {
    let mut tools = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ToolConfig::default(),
    };
    if let Some(path) = &cli.pdftotext {
        tools.pdftotext = path.clone();
    }
    if let Some(path) = &cli.pdftoppm {
        tools.pdftoppm = path.clone();
    }
    if let Some(dpi) = cli.dpi {
        tools.preview_dpi = dpi;
    }
    Ok(tools)
}
