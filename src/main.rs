//! Photo event finding tool
//!
//! Reads timestamped, optionally geo-tagged photo lines, clusters every
//! person's photos into places with P-DBSCAN, infers home, and segments the
//! photo stream into events (trips, outings, gatherings).

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cluster;
mod config;
mod error;
mod lines;
mod lookup;
mod person;

#[cfg(test)]
mod main_test;

use config::EngineConfig;
use lookup::{LocationLookup, LookupTable, write_lookup_table};
use person::{ClusteringOutcome, Person};

#[derive(Parser)]
#[command(name = "rust_event_finder")]
#[command(about = "Finds events in people's photo streams", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Cluster, infer home and report events for every person
    Events {
        #[command(flatten)]
        engine: EngineArgs,

        /// Lookup table replacing the photos' own address data
        /// (one lookup per local cluster)
        #[arg(short, long)]
        lookup: Option<PathBuf>,

        /// Event report file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write every photo line with home flag and local cluster id
        #[arg(short, long)]
        photos: Option<PathBuf>,
    },
    /// Write a lookup table from the centre photo of every local cluster
    SampleLookup {
        #[command(flatten)]
        engine: EngineArgs,

        /// Lookup table to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(ClapArgs)]
struct EngineArgs {
    /// Input file with tab separated photo lines
    #[arg(short, long, default_value = "photos.tsv")]
    input: PathBuf,

    /// JSON engine configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// P-DBSCAN minPoints parameter (minimum neighbours of a core photo)
    #[arg(short = 'm', long)]
    density: Option<usize>,

    /// P-DBSCAN epsilon parameter (coordinate units), 0 derives it from the data
    #[arg(short, long)]
    eps: Option<f64>,

    /// P-DBSCAN adaptive density ratio, 0 disables the gate
    #[arg(short, long)]
    adaptive_ratio: Option<f64>,

    /// Presentation split interval in seconds, 0 derives it from the data
    #[arg(short, long)]
    segment_interval: Option<i64>,
}

impl EngineArgs {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)
                .with_context(|| format!("Failed to read config {:?}", path))?,
            None => EngineConfig::default(),
        };

        if let Some(density) = self.density {
            config.clustering.density_threshold = density;
        }
        if let Some(eps) = self.eps {
            config.clustering.distance_threshold = (eps > 0.0).then_some(eps);
        }
        if let Some(ratio) = self.adaptive_ratio {
            config.clustering.adaptive_ratio = ratio;
        }
        if let Some(secs) = self.segment_interval {
            config.event.segment_interval_secs = (secs > 0).then_some(secs);
        }

        Ok(config)
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    let result = match &args.command {
        Command::Events {
            engine,
            lookup,
            output,
            photos,
        } => run_events(engine, lookup.as_deref(), output.as_deref(), photos.as_deref()),
        Command::SampleLookup { engine, output } => run_sample_lookup(engine, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins, otherwise `--debug` selects debug level
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn load_people(engine: &EngineArgs) -> Result<(Vec<Person>, EngineConfig)> {
    let config = engine.engine_config()?;
    let people = lines::read_people(&engine.input)
        .with_context(|| format!("Failed to read photos from {:?}", engine.input))?;

    if people.is_empty() {
        anyhow::bail!("No photos found in {:?}", engine.input);
    }
    Ok((people, config))
}

fn run_events(
    engine: &EngineArgs,
    lookup_path: Option<&Path>,
    output: Option<&Path>,
    photos_path: Option<&Path>,
) -> Result<()> {
    let (mut people, config) = load_people(engine)?;

    let table = match lookup_path {
        Some(path) => Some(
            LookupTable::read(path)
                .with_context(|| format!("Failed to read lookup table {:?}", path))?,
        ),
        None => None,
    };

    run_pipeline(&mut people, &config, table.as_ref().map(|t| t as &(dyn LocationLookup + Sync)));

    match output {
        None => write_reports(&mut io::stdout().lock(), &people, &config)?,
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
            write_reports(&mut BufWriter::new(file), &people, &config)?;
            info!(?path, "event report written");
        }
    }

    if let Some(path) = photos_path {
        let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        let mut writer = BufWriter::new(file);
        for person in &people {
            lines::write_photo_dump(&mut writer, person)?;
        }
        writer.flush()?;
        info!(?path, "photo dump written");
    }

    Ok(())
}

/// Runs every person's pipeline; people share nothing, so they run in parallel
fn run_pipeline(
    people: &mut [Person],
    config: &EngineConfig,
    lookup: Option<&(dyn LocationLookup + Sync)>,
) {
    people.par_iter_mut().for_each(|person| {
        let lookup = lookup.map(|l| l as &dyn LocationLookup);
        match person.run(config, lookup) {
            ClusteringOutcome::Insufficient {
                geo_photos,
                required,
            } => info!(
                person = person.name(),
                geo_photos, required, "local clustering unavailable, using time rules only"
            ),
            ClusteringOutcome::NoClusters { eps } => {
                warn!(person = person.name(), eps, "no local clusters found")
            }
            ClusteringOutcome::Clustered { .. } => {}
        }
    });
}

fn write_reports<W: Write>(writer: &mut W, people: &[Person], config: &EngineConfig) -> Result<()> {
    for person in people {
        lines::write_report(writer, person, config)?;
    }
    writer.flush()?;
    Ok(())
}

fn run_sample_lookup(engine: &EngineArgs, output: &Path) -> Result<()> {
    let (mut people, config) = load_people(engine)?;

    let rows: Vec<_> = people
        .par_iter_mut()
        .flat_map_iter(|person| {
            person.cluster_locations(&config.clustering);
            person.representative_locations()
        })
        .collect();

    write_lookup_table(output, &rows)
        .with_context(|| format!("Failed to write lookup table {:?}", output))?;
    info!(rows = rows.len(), ?output, "lookup table written");
    Ok(())
}
