use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use backoffice_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "backoffice", version, about = "Back-office financial reports")]
pub struct Cli {
    /// JSON dataset with parties, products, projects and documents.
    #[arg(long, short = 'd', global = true, default_value = "backoffice.json")]
    pub data: PathBuf,

    /// JSON file with reporting settings (near-due window, tax rate).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference date for due-date calculations (defaults to the local date).
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    #[arg(long, global = true, default_value = "json")]
    pub log_format: LogFormat,

    /// Print JSON output on a single line.
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Global figures for a year, optionally restricted to some months
    Dashboard {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<String>,
        /// Month number; repeat for several months
        #[arg(long = "month", short = 'm')]
        months: Vec<String>,
    },
    /// Account statement for one party
    Statement {
        /// Party tax id (RUT) or identifier
        party: String,
        /// First issue date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Last issue date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Balances for every active party
    Ledger,
    /// Write a party's debt report as CSV
    Export {
        /// Party tax id (RUT) or identifier
        party: String,
        /// Directory the report file is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Field delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        /// Write to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },
    /// Project figures; all projects unless a code is given
    Projects {
        #[arg(long)]
        code: Option<String>,
    },
    /// List document lines that have no priced product
    Check,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
