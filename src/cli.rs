use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize raw procurement extracts and load them into PostgreSQL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconcile, coerce, snapshot, and load all five canonical tables
    Run(RunArgs),
    /// Resolve raw sources and show how their headers map onto the canonical schema
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Directory containing the raw CSV extracts
    #[arg(long = "raw-dir", default_value = "data/raw")]
    pub raw_dir: PathBuf,
    /// Directory receiving the cleaned snapshots
    #[arg(long = "clean-dir", default_value = "data/cleaned")]
    pub clean_dir: PathBuf,
    /// Character encoding of the raw files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Stop after writing snapshots; do not touch the relational store
    #[arg(long = "skip-load")]
    pub skip_load: bool,
    /// Write a JSON report of cell-level coercion failures to this path
    #[arg(long = "quality-report")]
    pub quality_report: Option<PathBuf>,
    /// PostgreSQL user (falls back to PGUSER, then "vendor_user")
    #[arg(long = "pg-user")]
    pub pg_user: Option<String>,
    /// PostgreSQL password (falls back to PGPASS, then "vendor_pass")
    #[arg(long = "pg-password")]
    pub pg_password: Option<String>,
    /// PostgreSQL host (falls back to PGHOST, then "localhost")
    #[arg(long = "pg-host")]
    pub pg_host: Option<String>,
    /// PostgreSQL database (falls back to PGDB, then "vendor_db")
    #[arg(long = "pg-database")]
    pub pg_database: Option<String>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Directory containing the raw CSV extracts
    #[arg(long = "raw-dir", default_value = "data/raw")]
    pub raw_dir: PathBuf,
    /// Character encoding of the raw files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}
