mod chunk;
mod cli;
mod config;
mod csv_output;
mod error;
mod inventory_csv;
mod sqlite;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use clap::Parser;
use synop::prelude::*;
use tracing_subscriber::EnvFilter;

use cli::{Options, OutputType};
use error::CliError;

fn main() {
    let options = Options::parse();
    init_logging(options.verbose);

    if let Err(e) = run(options) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(options: Options) -> Result<(), CliError> {
    let inventory = inventory_csv::read(Path::new(&options.station_inventory))?;

    let filters = match &options.filter {
        Some(path) => config::FilterFile::read(Path::new(path))?,
        None => config::FilterFile::allow_all(),
    };

    let base_date = match &options.date {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")?,
        None => Utc::now().date_naive(),
    };

    let ctx = DecoderContext::new(filters, inventory, base_date);

    let mut store = ObservationStore::new();
    for path in input_files(&options)? {
        let text = fs::read_to_string(&path).map_err(CliError::Input)?;
        for bulletin in chunk::chunks(&text) {
            for observation in decode_bulletin(&bulletin, &ctx) {
                store.ingest(observation);
            }
        }
    }

    tracing::info!(count = store.len(), "decoded observations before merge");
    let primary = store.flush();

    match options.output_type {
        OutputType::Sqlite => sqlite::write(Path::new(&options.output), &ctx.inventory, &primary)?,
        OutputType::Csv => csv_output::write(Path::new(&options.output), &primary)?,
    }

    Ok(())
}

/// Resolve the `input` argument into a concrete file list: either the
/// lines of a list file (`-l/--list`) or the matches of a glob pattern.
fn input_files(options: &Options) -> Result<Vec<PathBuf>, CliError> {
    if options.list {
        let text = fs::read_to_string(&options.input).map_err(CliError::Input)?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    } else {
        let mut paths = Vec::new();
        for entry in glob::glob(&options.input)? {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => tracing::warn!("skipping unreadable glob entry: {e}"),
            }
        }
        Ok(paths)
    }
}
