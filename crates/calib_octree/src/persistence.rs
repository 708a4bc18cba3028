//! Line-based sample file format.
//!
//! One record per line:
//!
//! ```text
//! OctreeElement[Position, Yaw, Pitch]:<x>,<y>,<z>,<yaw>,<pitch>
//! ```
//!
//! Lines with another prefix, fewer than 5 fields, or a field that is not a
//! finite number are skipped on load. Extra fields are ignored.

use std::path::{Path, PathBuf};

use glam::DVec3;
use thiserror::Error;

use crate::types::Sample;

/// Literal text before the `:` of every record.
pub const RECORD_PREFIX: &str = "OctreeElement[Position, Yaw, Pitch]";

/// Extension appended to [`SampleStore::file_name`].
pub const FILE_EXTENSION: &str = "txt";

#[derive(Debug, Error)]
pub enum PersistError {
  #[error("sample store has no directory or file name")]
  Unconfigured,
  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Format one sample as a record line (no trailing newline).
///
/// Values use the shortest decimal form that parses back to the same `f64`.
pub fn format_sample(sample: &Sample) -> String {
  format!(
    "{}:{},{},{},{},{}",
    RECORD_PREFIX,
    sample.position.x,
    sample.position.y,
    sample.position.z,
    sample.offset_yaw,
    sample.offset_pitch
  )
}

/// Parse one record line. Returns None for anything that is not a complete
/// record.
pub fn parse_record(line: &str) -> Option<Sample> {
  let mut parts = line.trim_end_matches(&['\r', '\n'][..]).split(':');
  if parts.next()? != RECORD_PREFIX {
    return None;
  }

  let mut values = [0.0f64; 5];
  let mut fields = parts.next()?.split(',');
  for value in values.iter_mut() {
    *value = fields
      .next()?
      .trim()
      .parse::<f64>()
      .ok()
      .filter(|v| v.is_finite())?;
  }

  let [x, y, z, yaw, pitch] = values;
  Some(Sample::new(DVec3::new(x, y, z), yaw, pitch))
}

/// Parse every valid record in `text`, skipping the rest.
pub fn parse_records(text: &str) -> Vec<Sample> {
  text.lines().filter_map(parse_record).collect()
}

/// Format samples as newline-terminated records.
pub fn write_records(samples: &[Sample]) -> String {
  let mut out = String::new();
  for sample in samples {
    out.push_str(&format_sample(sample));
    out.push('\n');
  }
  out
}

/// Location of a sample file: `<directory>/<file_name>.txt`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleStore {
  pub directory: PathBuf,
  pub file_name: String,
}

impl SampleStore {
  pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
    Self {
      directory: directory.into(),
      file_name: file_name.into(),
    }
  }

  /// True if both directory and file name are set.
  pub fn is_configured(&self) -> bool {
    !self.directory.as_os_str().is_empty() && !self.file_name.is_empty()
  }

  /// Full path of the sample file.
  pub fn path(&self) -> PathBuf {
    self
      .directory
      .join(format!("{}.{}", self.file_name, FILE_EXTENSION))
  }

  /// Write `samples` to the file, replacing it.
  ///
  /// An empty sample list writes nothing.
  pub fn save(&self, samples: &[Sample]) -> Result<(), PersistError> {
    if !self.is_configured() {
      return Err(PersistError::Unconfigured);
    }
    if samples.is_empty() {
      log::debug!("No samples to save to {}", self.path().display());
      return Ok(());
    }

    let path = self.path();
    std::fs::write(&path, write_records(samples)).map_err(|source| PersistError::Io {
      path: path.clone(),
      source,
    })?;
    log::info!("Saved {} samples to {}", samples.len(), path.display());
    Ok(())
  }

  /// Read every valid record from the file.
  pub fn load(&self) -> Result<Vec<Sample>, PersistError> {
    if !self.is_configured() {
      return Err(PersistError::Unconfigured);
    }
    load_samples(&self.path())
  }
}

/// Read every valid record from `path`.
pub fn load_samples(path: &Path) -> Result<Vec<Sample>, PersistError> {
  let text = std::fs::read_to_string(path).map_err(|source| PersistError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  let samples = parse_records(&text);
  log::info!("Loaded {} samples from {}", samples.len(), path.display());
  Ok(samples)
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;
