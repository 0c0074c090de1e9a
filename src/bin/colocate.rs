use clap::Parser;
use tracing::{info, warn};

use camino::Utf8PathBuf;
use overpass::catalog::FileCatalog;
use overpass::colocation::ColocParams;
use overpass::constants::{
    DEFAULT_MAX_DISTANCE_DEG, DEFAULT_MAX_TIME_OFFSET_HOURS, DEFAULT_WINDOW_SIZE_DAYS,
    DEFAULT_YEARS,
};
use overpass::overpass::Overpass;
use overpass::overpass_errors::OverpassError;
use overpass::pipeline::{ColocationPipeline, CsvSink};
use overpass::tracks::ImagerDecoder;

/// Colocate two satellite instrument archives into per-window CSV artifacts.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Config {
    /// Root directory of the profiling instrument's archive.
    #[arg(long, value_name = "DIR")]
    profile_root: Utf8PathBuf,

    /// Root directory of the imaging instrument's archive.
    #[arg(long, value_name = "DIR")]
    imager_root: Utf8PathBuf,

    /// Directory receiving one CSV artifact per window.
    #[arg(long, value_name = "DIR", default_value = "colocated")]
    output_dir: Utf8PathBuf,

    /// Calendar years to process.
    #[arg(long, value_name = "YEAR", num_args = 1.., value_delimiter = ',',
          default_values_t = DEFAULT_YEARS)]
    years: Vec<u16>,

    /// Maximum nearest-neighbor distance, in degrees.
    #[arg(long, value_name = "DEG", default_value_t = DEFAULT_MAX_DISTANCE_DEG)]
    max_distance_deg: f64,

    /// Maximum temporal offset between paired records, in hours.
    #[arg(long, value_name = "HOURS", default_value_t = DEFAULT_MAX_TIME_OFFSET_HOURS)]
    max_time_offset_hours: f64,

    /// Disable the temporal filter entirely.
    #[arg(long, default_value_t = false)]
    no_time_filter: bool,

    /// Days accumulated per flushed window.
    #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_WINDOW_SIZE_DAYS)]
    window_size_days: usize,

    /// Decoder pool size, all available cores when omitted.
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Verbose logging (DEBUG level)
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

impl Config {
    fn params(&self) -> Result<ColocParams, OverpassError> {
        let builder = ColocParams::builder().max_distance_deg(self.max_distance_deg);
        if self.no_time_filter {
            builder.no_time_filter().build()
        } else {
            builder.max_time_offset_hours(self.max_time_offset_hours).build()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_logging(config.verbose);

    let params = config.params()?;
    info!(
        profile_root = %config.profile_root,
        imager_root = %config.imager_root,
        output_dir = %config.output_dir,
        years = ?config.years,
        "starting colocation run"
    );

    let mut state = Overpass::new();
    let catalog = FileCatalog::enumerate(
        &mut state,
        &config.profile_root,
        &config.imager_root,
        &config.years,
    )?;
    if catalog.is_empty() {
        warn!("no archive files matched the requested years");
    }

    let sink = CsvSink::new(config.output_dir.clone());
    let mut pipeline = ColocationPipeline::new(
        params,
        config.window_size_days,
        config.workers,
        ImagerDecoder::default(),
        sink,
    )?;
    let report = pipeline.run(&state, &catalog, &config.years)?;

    println!("{report:#}");
    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .init();
}
