//! OctreeConfig - per-tree bounds and subdivision limits.

use std::path::Path;

use glam::DVec3;
use serde::Deserialize;
use thiserror::Error;

use super::BoundingBox;

/// Errors raised while loading or validating an [`OctreeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse config TOML: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("extent must be non-negative on all axes, got {0}")]
  NegativeExtent(DVec3),
  #[error("max_elements must be at least 1")]
  ZeroMaxElements,
  #[error("max_depth must be at least 1")]
  ZeroMaxDepth,
}

/// Configuration consumed when the root node is created.
///
/// Limits live here rather than in globals, so independent trees can use
/// different limits.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
  /// Center of the root box.
  pub origin: DVec3,

  /// Half-width of the root box per axis.
  pub extent: DVec3,

  /// Samples a leaf may hold before inserts overflow.
  pub max_elements: usize,

  /// Depth at which nodes stop accepting inserts. Samples settle at
  /// `max_depth - 1`.
  pub max_depth: u32,
}

impl OctreeConfig {
  /// Bounds of the root node.
  #[inline]
  pub fn root_bounds(&self) -> BoundingBox {
    BoundingBox::new(self.origin, self.extent, 0)
  }

  /// Check that the limits describe a usable tree.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.extent.x < 0.0 || self.extent.y < 0.0 || self.extent.z < 0.0 {
      return Err(ConfigError::NegativeExtent(self.extent));
    }
    if self.max_elements == 0 {
      return Err(ConfigError::ZeroMaxElements);
    }
    if self.max_depth == 0 {
      return Err(ConfigError::ZeroMaxDepth);
    }
    Ok(())
  }

  /// Parse and validate a config from TOML text.
  ///
  /// Missing keys fall back to [`OctreeConfig::default`].
  pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
    let config: OctreeConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  /// Load and validate a config from a TOML file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.display().to_string(),
      source,
    })?;
    Self::from_toml_str(&text)
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      origin: DVec3::ZERO,
      extent: DVec3::splat(128.0),
      max_elements: 2,
      max_depth: 1,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
