//! streamside CLI entrypoint

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use streamside::convert::{convert_path, Direction};
use streamside::{ConvertConfig, Layout, VariablePolicy};

// ============================================================================
// Command line
// ============================================================================

#[derive(Parser)]
#[command(name = "streamside")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert semantic graph annotations between JSON and Penman")]
#[command(long_about = r#"
Batch converters for AMR-style graph annotations.

EXAMPLES:
  # Every *.json file in a directory, output next to the inputs
  streamside json-to-penman -i annotations/

  # One Penman file into a chosen output directory
  streamside penman-to-json -i wsj.penman -o out/

  # Start an annotation file from raw sentences, one per line
  streamside --annotator jdchoi text-to-json -i sentences.txt

ENVIRONMENT VARIABLES:
  RUST_LOG        Log filter (default: warn; raised by -v)
"#)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// JSON configuration file; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Layout of printed graphs
    #[arg(long, global = true, value_enum)]
    layout: Option<LayoutArg>,

    /// Spaces per level for the indented layout (implies --layout indented)
    #[arg(long, global = true)]
    indent: Option<usize>,

    /// How variables are chosen when printing Penman
    #[arg(long, global = true, value_enum)]
    variables: Option<VariablesArg>,

    /// Print records that have no graph yet
    #[arg(long, global = true)]
    keep_empty: bool,

    /// Annotator id stamped on records imported from text
    #[arg(short, long, global = true)]
    annotator: Option<String>,

    /// Worker threads for directory conversion
    #[arg(short, long, global = true)]
    jobs: Option<usize>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// JSON annotation files to Penman
    JsonToPenman(IoArgs),
    /// Penman files to JSON annotation files
    PenmanToJson(IoArgs),
    /// Sentence-per-line text to empty JSON annotation files
    TextToJson(IoArgs),
}

#[derive(Args, Debug, Clone)]
struct IoArgs {
    /// A file, or a directory of files to convert
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory, or output file for a single input file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    Aligned,
    Indented,
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariablesArg {
    Preserve,
    Initial,
    Sequential,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let config = build_config(&cli.global)?;
    let (direction, io) = match cli.command {
        Commands::JsonToPenman(io) => (Direction::JsonToPenman, io),
        Commands::PenmanToJson(io) => (Direction::PenmanToJson, io),
        Commands::TextToJson(io) => (Direction::TextToJson, io),
    };

    let report = convert_path(&io.input, io.output.as_deref(), direction, &config);
    for failure in &report.failures {
        eprintln!("{failure}");
    }
    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{} of {} file(s) failed", report.failures.len(), report.total());
        Ok(ExitCode::FAILURE)
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(global: &GlobalOptions) -> Result<ConvertConfig> {
    let mut config = match &global.config {
        Some(path) => ConvertConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConvertConfig::default(),
    };

    match (global.layout, global.indent) {
        (Some(LayoutArg::Aligned), None) => config.layout = Layout::Aligned,
        (Some(LayoutArg::Compact), None) => config.layout = Layout::Compact,
        (Some(LayoutArg::Indented), None) => config.layout = Layout::Indented(4),
        (None | Some(LayoutArg::Indented), Some(width)) => config.layout = Layout::Indented(width),
        (Some(other), Some(_)) => anyhow::bail!("--indent only applies to --layout indented, not {other:?}"),
        (None, None) => {}
    }
    if let Some(variables) = global.variables {
        config.variables = match variables {
            VariablesArg::Preserve => VariablePolicy::Preserve,
            VariablesArg::Initial => VariablePolicy::Initial,
            VariablesArg::Sequential => VariablePolicy::sequential("c"),
        };
    }
    if global.keep_empty {
        config.keep_empty = true;
    }
    if let Some(annotator) = &global.annotator {
        config.annotator = annotator.clone();
    }
    if let Some(jobs) = global.jobs {
        config.jobs = Some(jobs);
    }

    config.validate().context("invalid options")?;
    Ok(config)
}
