//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Calibration REPL - correlate calibrations and linear fits into derivative packages.
#[derive(Parser, Debug, Default)]
#[command(name = "calbr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (overrides CALBR_CONFIG)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding *.pCal / *.fCal calibrations
    #[arg(long, value_name = "DIR")]
    pub calibrates: Option<PathBuf>,

    /// Directory holding *.xls linear fits
    #[arg(long, value_name = "DIR")]
    pub linearfits: Option<PathBuf>,

    /// Directory where derivative packages are assembled
    #[arg(long, value_name = "DIR")]
    pub derivatives: Option<PathBuf>,

    /// Default destination for copy/move/concat
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Print the resolved settings and exit
    #[arg(long)]
    pub show_config: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long)]
    pub verbose: bool,
}
