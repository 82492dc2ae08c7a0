use std::path::PathBuf;

use clap::{Parser, Subcommand};

use thermo_wheel::ReportFormat;

#[derive(Parser, Debug)]
#[command(name = "thermo-wheel")]
#[command(
    author,
    version,
    about = "Wheel thermal-profile classifier with a tunable cut-off"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// JSON config file
    #[arg(long, env = "THERMO_WHEEL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Model artifact path (overrides the config file)
    #[arg(long, env = "THERMO_WHEEL_MODEL", global = true)]
    pub model: Option<PathBuf>,

    /// Decision cut-off on P(positive), strictly between 0 and 1
    #[arg(long, global = true)]
    pub cutoff: Option<f64>,

    /// Without a subcommand the desktop app starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyse a file without opening the window
    Analyze {
        /// Input table (.xlsx, .xls, .ods, .csv or .parquet)
        input: PathBuf,

        /// Where to write the report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format: xlsx or csv
        #[arg(short, long)]
        format: Option<ReportFormat>,

        /// Copy columns after the 36 features into the report
        #[arg(long)]
        passthrough: bool,
    },
}
