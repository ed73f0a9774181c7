use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use unredact::LayoutMode;

/// Recover text hidden under PDF redaction boxes.
#[derive(Debug, Parser)]
#[command(name = "unredact", about, version)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write an UNREDACTED_ copy of every input PDF
    Process {
        /// PDF files or directories to scan for PDFs
        #[arg(value_name = "INPUTS", required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the output files (created if missing)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Where the recovered text goes
        #[arg(long, value_enum, default_value_t = ModeArg::SideBySide)]
        mode: ModeArg,

        /// Only scan the top level of input directories
        #[arg(long)]
        no_recursive: bool,

        /// Also write the per-file results as JSON to this path
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        #[command(flatten)]
        words: WordArgs,
    },

    /// Print the recovered text lines of each page
    Lines {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        words: WordArgs,
    },

    /// Print the words of each page with their boxes
    Words {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        words: WordArgs,
    },

    /// List the PDFs in a directory with their page counts
    List {
        /// Directory to list
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Word grouping tolerances shared by `process`, `lines` and `words`.
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct WordArgs {
    /// Horizontal tolerance for word grouping
    #[arg(long, default_value_t = 3.0)]
    pub x_tolerance: f64,

    /// Vertical tolerance for word grouping
    #[arg(long, default_value_t = 3.0)]
    pub y_tolerance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Original page on the left, recovered text on the right
    #[value(name = "side_by_side")]
    SideBySide,
    /// Recovered text drawn in white over the original page
    #[value(name = "overlay_white")]
    OverlayWhite,
}

impl From<ModeArg> for LayoutMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::SideBySide => LayoutMode::SideBySide,
            ModeArg::OverlayWhite => LayoutMode::OverlayWhite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}
