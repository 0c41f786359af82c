//! Generate synthetic crop time series for AstroFarm parcels.

use astrofarm_common::SeedSource;
use astrofarm_runner::{
    init_logging, run_generate_series, GenerateSeriesOptions, DEFAULT_DAYS, DEFAULT_NUM_PARCELS,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate time series data for AstroFarm
#[derive(Parser, Debug)]
#[command(name = "generate-series", version, about)]
struct Args {
    /// Output directory
    #[arg(long)]
    output: PathBuf,

    /// Parcels GeoJSON file
    #[arg(long)]
    parcels: Option<PathBuf>,

    /// Number of days to generate
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    days: u32,

    /// Number of parcels to generate when no parcels file is given
    #[arg(long, default_value_t = DEFAULT_NUM_PARCELS)]
    num_parcels: usize,

    /// Random seed; drawn from the OS and logged when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let options = GenerateSeriesOptions {
        output: args.output,
        parcels: args.parcels,
        days: args.days,
        num_parcels: args.num_parcels,
        seed: SeedSource::from_option(args.seed),
    };

    match run_generate_series(&options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
