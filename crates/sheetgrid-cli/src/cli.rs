use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Rebuild table rows and columns from positioned PDF text tokens.
#[derive(Debug, Parser)]
#[command(name = "sheetgrid", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconstruct one sheet per page
    Sheets {
        /// Path to the token JSON file ('-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        grid: GridArgs,

        /// Process pages one after another instead of in parallel
        #[arg(long)]
        sequential: bool,
    },

    /// List the row buckets tokens were grouped into
    Buckets {
        /// Path to the token JSON file ('-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        grid: GridArgs,
    },

    /// Display page and token counts
    Info {
        /// Path to the token JSON file ('-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,
    },
}

/// Reconstruction settings shared by the sheet-producing subcommands.
#[derive(Debug, Clone, Args)]
pub struct GridArgs {
    /// Vertical distance within which tokens share a row (default: 10.0)
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub row_tolerance: f64,

    /// Where the token source puts the y-axis origin
    #[arg(long, value_enum, default_value_t = OriginArg::BottomUp)]
    pub origin: OriginArg,

    /// How tokens are grouped into rows
    #[arg(long, value_enum, default_value_t = ClusteringArg::Quantize)]
    pub clustering: ClusteringArg,
}

/// Output format for tabular subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable grid / tab-separated listing
    Text,
    /// JSON array
    Json,
    /// Comma-separated values
    Csv,
}

/// Output format for summary subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextFormat {
    /// Plain text
    Text,
    /// JSON object
    Json,
}

/// Y-axis origin of the token source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OriginArg {
    /// y grows upward (PDF user space)
    BottomUp,
    /// y grows downward (top-left origin)
    TopDown,
}

/// Row grouping method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClusteringArg {
    /// Round y to the nearest multiple of the row tolerance
    Quantize,
    /// Split rows where consecutive y values differ by more than the tolerance
    Gap,
}
