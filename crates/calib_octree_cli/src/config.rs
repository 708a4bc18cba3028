//! Configuration parsing for the calibration octree tool.

use anyhow::{Context, Result};
use calib_octree::{OctreeConfig, SampleStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration file.
#[derive(Debug, Deserialize)]
pub struct Config {
	/// Root bounds and subdivision limits.
	#[serde(default)]
	pub octree: OctreeConfig,
	/// Where the sample file lives (optional when `--samples` is given).
	pub storage: Option<StorageConfig>,
}

/// Sample file location.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
	/// Directory holding the sample file, relative to the config file.
	pub directory: PathBuf,
	/// File name without the `.txt` extension.
	pub file_name: String,
}

impl Config {
	/// Parse and validate configuration text.
	pub fn parse(text: &str) -> Result<Self> {
		let config: Config = toml::from_str(text).context("Failed to parse config TOML")?;
		config
			.octree
			.validate()
			.context("Invalid [octree] section")?;

		if let Some(storage) = &config.storage {
			if storage.file_name.is_empty() {
				anyhow::bail!("[storage] file_name must not be empty");
			}
		}

		Ok(config)
	}

	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Sample store from `[storage]`, with the directory resolved against
	/// `base_dir`.
	pub fn store(&self, base_dir: &Path) -> Option<SampleStore> {
		self.storage
			.as_ref()
			.map(|s| SampleStore::new(base_dir.join(&s.directory), s.file_name.clone()))
	}
}

/// Sample store for an explicit file path such as `data/session.txt`.
pub fn store_for_file(path: &Path) -> Result<SampleStore> {
	let file_name = path
		.file_stem()
		.and_then(|stem| stem.to_str())
		.with_context(|| format!("Sample path has no file name: {}", path.display()))?;
	let directory = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
		_ => PathBuf::from("."),
	};
	Ok(SampleStore::new(directory, file_name))
}
