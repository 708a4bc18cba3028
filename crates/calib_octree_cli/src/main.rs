//! Calibration octree tool.
//!
//! Builds an octree from a sample file, answers correction queries for a
//! camera position, and records new samples.
//!
//! Sample file records:
//! - `OctreeElement[Position, Yaw, Pitch]:<x>,<y>,<z>,<yaw>,<pitch>`

mod config;

use anyhow::{Context, Result};
use calib_octree::{OctreeController, SampleStore};
use clap::{Parser, Subcommand};
use glam::DVec3;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};

use config::Config;

/// Build and query camera calibration octrees.
#[derive(Parser, Debug)]
#[command(name = "calib-octree")]
#[command(about = "Builds and queries camera calibration octrees")]
struct Args {
	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: PathBuf,

	/// Sample file (default: [storage] from the config).
	#[arg(short, long)]
	samples: Option<PathBuf>,

	/// More log output (-v debug, -vv trace).
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Load the sample file and report the resulting tree.
	Build,
	/// Print the yaw/pitch correction at a position.
	Query {
		/// Camera position as `x,y,z`.
		#[arg(short, long, value_parser = parse_position, allow_hyphen_values = true)]
		position: DVec3,
	},
	/// Record a sample and write the sample file back.
	Insert {
		/// Camera position as `x,y,z`.
		#[arg(short, long, value_parser = parse_position, allow_hyphen_values = true)]
		position: DVec3,
		#[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
		yaw: f64,
		#[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
		pitch: f64,
	},
}

fn parse_position(text: &str) -> Result<DVec3, String> {
	let values = text
		.split(',')
		.map(|v| v.trim().parse::<f64>())
		.collect::<Result<Vec<_>, _>>()
		.map_err(|e| format!("invalid coordinate in '{}': {}", text, e))?;
	match values.as_slice() {
		[x, y, z] => Ok(DVec3::new(*x, *y, *z)),
		_ => Err(format!("expected x,y,z, got '{}'", text)),
	}
}

fn main() -> Result<()> {
	let args = Args::parse();

	let level = match args.verbose {
		0 => LevelFilter::Info,
		1 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};
	TermLogger::init(
		level,
		simplelog::Config::default(),
		TerminalMode::Mixed,
		ColorChoice::Auto,
	)
	.context("Failed to initialise logger")?;

	let config = Config::load(&args.config)?;
	let config_dir = args.config.parent().unwrap_or(Path::new("."));

	let store = match &args.samples {
		Some(path) => Some(config::store_for_file(path)?),
		None => config.store(config_dir),
	};

	let mut controller = OctreeController::new(config.octree.clone());

	match args.command {
		Command::Build => {
			let store = store.context("No sample file: pass --samples or add [storage]")?;
			load_into(&mut controller, &store)?;
			controller.tree().log_tree();

			let stats = controller.tree().stats();
			println!(
				"nodes: {} leaves: {} samples: {} deepest: {}",
				stats.nodes, stats.leaves, stats.samples, stats.deepest
			);
		}
		Command::Query { position } => {
			if let Some(store) = &store {
				load_into(&mut controller, store)?;
			}
			if !controller.find_octree_node(position) {
				log::warn!("Position {} is outside the octree", position);
			}
			let correction = controller.correction_from_root(position);
			println!("{} {}", correction.yaw, correction.pitch);
		}
		Command::Insert {
			position,
			yaw,
			pitch,
		} => {
			let store = store.context("No sample file: pass --samples or add [storage]")?;
			let saved = record_sample(&mut controller, &store, position, yaw, pitch)?;
			println!("Saved {} samples to {}", saved, store.path().display());
		}
	}

	Ok(())
}

/// Load the sample file into `controller`, returning how many records the
/// current octree limits rejected.
fn load_into(controller: &mut OctreeController, store: &SampleStore) -> Result<usize> {
	let samples = store
		.load()
		.with_context(|| format!("Failed to load: {}", store.path().display()))?;
	let parsed = samples.len();
	let accepted = controller.insert_samples(samples);
	let rejected = parsed - accepted;

	if rejected > 0 {
		log::warn!(
			"{} of {} records in {} were rejected by the current octree limits",
			rejected,
			parsed,
			store.path().display()
		);
	}
	log::info!("Loaded {} samples from {}", accepted, store.path().display());
	Ok(rejected)
}

/// Add one sample to the sample file, returning the number of samples saved.
///
/// Refuses to write when reloading the existing file already dropped records,
/// since saving would remove them from the file.
fn record_sample(
	controller: &mut OctreeController,
	store: &SampleStore,
	position: DVec3,
	yaw: f64,
	pitch: f64,
) -> Result<usize> {
	if store.path().exists() {
		let rejected = load_into(controller, store)?;
		if rejected > 0 {
			anyhow::bail!(
				"{} records in {} do not fit the current octree limits; not saving",
				rejected,
				store.path().display()
			);
		}
	}

	if !controller.insert_sample(position, yaw, pitch) {
		anyhow::bail!("Sample at {} was rejected (out of range or node full)", position);
	}
	controller
		.save(store)
		.with_context(|| format!("Failed to save: {}", store.path().display()))?;
	Ok(controller.tree().stats().samples)
}
