pub mod cli;
pub mod coerce;
pub mod config;
pub mod derive;
pub mod io_utils;
pub mod keys;
pub mod model;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod schema;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("procure_etl", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => pipeline::execute(&args),
        Commands::Inspect(args) => pipeline::inspect(&args),
    }
}
