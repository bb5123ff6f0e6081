use anyhow::Context;
use clap::Parser;
use radius_zips::apis::RadiusApiClient;
use radius_zips::app::{RunRequest, RunUseCase};
use radius_zips::config::Config;
use radius_zips::constants::{DEFAULT_CONFIG_FILE, DEFAULT_RADIUS};
use radius_zips::logging;
use radius_zips::types::RadiusLookup;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "radius_zips")]
#[command(about = "Read a CSV describing different cities, and return all zip codes within a radius")]
#[command(version)]
struct Cli {
    /// Input CSV file
    input_file: PathBuf,

    /// Output CSV. Defaults to the input name with the extension ".out.csv"
    output_file: Option<PathBuf>,

    /// Query the radius API for every zip code in the total_zips column
    #[arg(short, long)]
    enrich: bool,

    /// Radius in miles within which to search for zip codes
    #[arg(short, long, default_value_t = DEFAULT_RADIUS)]
    radius: u32,

    /// TOML config with lookup settings and provider tables
    #[arg(short, long, env = "RADIUS_ZIPS_CONFIG")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> radius_zips::error::Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(&PathBuf::from(DEFAULT_CONFIG_FILE)),
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();
    // No metrics recorder is installed; the per-run counts are printed below.
    // Install one (e.g. metrics-exporter-prometheus) here to collect the
    // radius_zips_* counters.

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref()).context("Failed to load configuration")?;

    let request = RunRequest {
        output: cli
            .output_file
            .clone()
            .unwrap_or_else(|| RunRequest::default_output(&cli.input_file)),
        input: cli.input_file,
        enrich: cli.enrich,
        radius: cli.radius,
    };
    info!(
        input = %request.input.display(),
        output = %request.output.display(),
        enrich = request.enrich,
        radius = request.radius,
        "Starting run"
    );

    let connect = |lookup: &radius_zips::config::LookupConfig| {
        RadiusApiClient::from_config(lookup).map(|client| Box::new(client) as Box<dyn RadiusLookup>)
    };
    let progress = |done: usize, total: usize| {
        print!("Completed: {:.2}%\r", (done * 100) as f64 / total as f64);
        let _ = std::io::stdout().flush();
    };

    let summary = match RunUseCase::new(&config).execute(&request, connect, progress) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Run failed: {}", e);
            return Err(e).context(format!("Failed to process {}", request.input.display()));
        }
    };

    println!();
    if let Some(result) = &summary.enrichment {
        println!("📊 Enrichment (radius {}):", result.radius);
        println!("   Rows: {}", result.rows);
        println!("   Keys resolved: {}", result.keys_resolved);
        println!("   Cache hits: {}", result.cache_hits);
        println!("   Remote lookups: {}", result.remote_lookups);
        println!("   Cache flushes: {}", result.flushes);
        println!("   Cache file: {}", result.cache_file);
    }
    for column in &summary.join.joined {
        println!("🔗 Joined column: {}", column);
    }
    for skipped in &summary.join.skipped {
        println!("⚠️  Skipped missing provider file: {}", skipped.display());
    }
    println!("💾 Wrote {} rows to {}", summary.rows, summary.output.display());
    Ok(())
}
