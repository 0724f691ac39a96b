use clap::{Parser, ValueEnum};

/// Output container format (`spec.md` §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputType {
    Csv,
    Sqlite,
}

#[derive(Debug, Parser)]
#[command(
    name = "synop",
    version,
    author = "synop contributors",
    about = "Decode WMO SYNOP (AAXX) bulletin files into CSV or sqlite"
)]
pub struct Options {
    /// Activate verbose (debug-level) logging
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// YAML filter file restricting admitted countries and stations
    #[arg(short, long, default_value = None)]
    pub filter: Option<String>,

    /// Base date (YYYY-MM-DD) used to resolve the report's day-of-month;
    /// defaults to today (UTC)
    #[arg(short, long, default_value = None)]
    pub date: Option<String>,

    /// Output container format
    #[arg(short = 't', long = "type", value_enum, default_value = "sqlite")]
    pub output_type: OutputType,

    /// Treat `input` as a newline-delimited file of paths rather than a glob
    #[arg(short, long, default_value = "false")]
    pub list: bool,

    /// Station inventory CSV (wmo, icao, lat, lon, ele, name, int_name)
    pub station_inventory: String,

    /// Output container path (CSV file or sqlite database)
    pub output: String,

    /// Input glob pattern, or (with `-l`) a newline-delimited list file
    pub input: String,
}
