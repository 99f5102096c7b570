use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reportfetch")]
#[command(
    about = "Download report PDFs from a worklist and reconcile their status",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (defaults to $REPORTFETCH_CONFIG or config/reportfetch.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every worklist row that is not already on disk
    Download,
    /// Validate downloaded documents and write the annotated worklist
    Reconcile(ReportArgs),
    /// Download, then reconcile
    Run(ReportArgs),
    /// Insert valid documents into the record store
    Load,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
