//! calc-routes: snap a location-history export onto OSM road networks.
//!
//! # Usage
//!
//! ```text
//! cargo run --release -p calc-routes -- \
//!     --input-file location-history.json \
//!     --output-file routes.json \
//!     --pbf portugal-latest.osm.pbf \
//!     --config config.toml
//! ```
//!
//! Both networks are clipped to `map.dist` metres around `map.center_point`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;

use lh_output::JsonWriter;
use lh_pipeline::{Config, run};
use lh_spatial::RoadNetwork;
use lh_spatial::osm::{Area, NetworkKind, load_from_pbf};

#[derive(Parser, Debug)]
#[command(
    name = "calc-routes",
    version,
    about = "Snap a location-history export onto OSM walk and drive networks",
    long_about = "Reads a location-history JSON export, keeps records strictly inside the \
                  configured time window, routes every declared activity and every \
                  consecutive pair of timeline points over the walk or drive network, \
                  and writes the routes, the flattened timeline and the visits as JSON.\n\n\
                  The config file is TOML, not YAML.  It keeps the same keys: \
                  [map] start, end, center_point, dist and [compute] max_workers. \
                  A config.yaml converts line for line: quote the timestamps and \
                  write `key = value` instead of `key: value`."
)]
struct Args {
    /// Location-history export (JSON array)
    #[arg(long)]
    input_file: PathBuf,

    /// Output JSON file
    #[arg(long)]
    output_file: PathBuf,

    /// TOML config (not YAML) with [map] start/end/center_point/dist and [compute] max_workers
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// OSM PBF extract covering the configured area
    #[arg(long)]
    pbf: PathBuf,

    /// Override compute.max_workers
    #[arg(long)]
    max_workers: Option<usize>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn load_network(args: &Args, kind: NetworkKind, area: Area) -> Result<RoadNetwork> {
    let t0 = Instant::now();
    let network = load_from_pbf(&args.pbf, kind, Some(area))
        .with_context(|| format!("Failed to load {kind:?} network from {}", args.pbf.display()))?;
    log::info!(
        "  {kind:?}: {} nodes, {} edges ({:.1}s)",
        network.node_count(),
        network.edge_count(),
        t0.elapsed().as_secs_f64()
    );
    if network.is_empty() {
        bail!("{kind:?} network is empty; check map.center_point and map.dist against {}", args.pbf.display());
    }
    Ok(network)
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    if let Some(n) = args.max_workers {
        config.compute.max_workers = n;
    }
    config.validate().context("Invalid configuration")?;

    log::info!("Input:  {}", args.input_file.display());
    log::info!("Output: {}", args.output_file.display());
    log::info!("Window: {} .. {}", config.map.start, config.map.end);

    if !args.input_file.exists() {
        bail!("Input file does not exist: {}", args.input_file.display());
    }

    let area = Area { center: config.center(), radius_m: config.map.dist };
    log::info!("Loading networks within {:.0} m of {}...", area.radius_m, area.center);
    let walk = load_network(&args, NetworkKind::Walk, area)?;
    let drive = load_network(&args, NetworkKind::Drive, area)?;

    let t0 = Instant::now();
    let out = run(&config, &args.input_file, &walk, &drive).context("Route computation failed")?;
    log::info!("{} ({:.1}s)", out.summary, t0.elapsed().as_secs_f64());

    JsonWriter::new(&args.output_file)
        .write(&out.document)
        .with_context(|| format!("Failed to write {}", args.output_file.display()))?;

    log::info!("Done.");
    Ok(())
}
