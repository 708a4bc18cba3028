//! CalibrationOctree - a root node paired with the limits it was built with.

use glam::DVec3;
use rayon::prelude::*;

use super::{BoundingBox, NodePath, OctreeConfig, OctreeNode};
use crate::interpolation::interpolate_offset;
use crate::types::{OffsetRotation, Sample};

/// Shape summary of a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
  /// Total number of nodes, root included.
  pub nodes: usize,
  /// Nodes without children.
  pub leaves: usize,
  /// Stored samples.
  pub samples: usize,
  /// Depth of the deepest node.
  pub deepest: u32,
}

/// Octree of calibration samples.
///
/// Owns every node. Callers refer to nodes through [`NodePath`] handles,
/// which stay valid while the tree grows since nodes are only removed when a
/// subdivision made by the same insert is rolled back.
#[derive(Clone, Debug)]
pub struct CalibrationOctree {
  config: OctreeConfig,
  root: OctreeNode,
}

impl CalibrationOctree {
  /// Create an empty tree covering `config.origin ± config.extent`.
  pub fn new(config: OctreeConfig) -> Self {
    let root = OctreeNode::new(config.root_bounds());
    Self { config, root }
  }

  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  pub fn root(&self) -> &OctreeNode {
    &self.root
  }

  /// Root bounds (origin and extent of the whole tree).
  pub fn bounds(&self) -> &BoundingBox {
    self.root.bounds()
  }

  /// Resolve a node handle.
  pub fn node(&self, path: &NodePath) -> Option<&OctreeNode> {
    self.root.node(path)
  }

  // ===========================================================================
  // Insertion
  // ===========================================================================

  /// Insert a sample starting at the root.
  pub fn insert(&mut self, position: DVec3, offset_yaw: f64, offset_pitch: f64) -> bool {
    self.insert_sample(Sample::new(position, offset_yaw, offset_pitch))
  }

  /// Insert a bare position with zero offsets.
  pub fn insert_position(&mut self, position: DVec3) -> bool {
    self.insert_sample(Sample::at(position))
  }

  pub fn insert_sample(&mut self, sample: Sample) -> bool {
    self.root.insert(&self.config, sample)
  }

  /// Insert a sample starting at the node addressed by `path`.
  ///
  /// Returns false if the path does not resolve or the node rejects the
  /// sample.
  pub fn insert_at(&mut self, path: &NodePath, sample: Sample) -> bool {
    let config = &self.config;
    match self.root.node_mut(path) {
      Some(node) => node.insert(config, sample),
      None => false,
    }
  }

  /// Insert every sample, returning how many were accepted.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::build_with_samples"))]
  pub fn build_with_samples<I>(&mut self, samples: I) -> usize
  where
    I: IntoIterator<Item = Sample>,
  {
    let mut accepted = 0;
    let mut total = 0;
    for sample in samples {
      total += 1;
      log::debug!(
        "Insert octree. position: {} offset [yaw, pitch]: [{}, {}]",
        sample.position,
        sample.offset_yaw,
        sample.offset_pitch
      );
      if self.insert_sample(sample) {
        accepted += 1;
      }
    }
    log::info!("Built octree: {} of {} samples accepted", accepted, total);
    accepted
  }

  /// Insert every position with zero offsets, returning how many were
  /// accepted.
  pub fn build_with_positions<I>(&mut self, positions: I) -> usize
  where
    I: IntoIterator<Item = DVec3>,
  {
    self.build_with_samples(positions.into_iter().map(Sample::at))
  }

  // ===========================================================================
  // Queries
  // ===========================================================================

  /// Path to the deepest node containing `position`.
  pub fn find_node(&self, position: DVec3) -> Option<NodePath> {
    self.root.find_containing_path(position)
  }

  /// Nearest sample to `position` within the node at `path`.
  pub fn find_nearest(
    &self,
    path: &NodePath,
    position: DVec3,
    excluding: Option<&Sample>,
  ) -> Option<Sample> {
    self.node(path)?.find_nearest(position, excluding)
  }

  /// Nearest and second-nearest samples within the node at `path`.
  pub fn find_nearest_pair(&self, path: &NodePath, position: DVec3) -> Option<(Sample, Sample)> {
    let node = self.node(path)?;
    let first = node.find_nearest(position, None)?;
    let second = node.find_nearest(position, Some(&first))?;
    Some((first, second))
  }

  /// Interpolated correction at `position` using the nearest pair within
  /// the node at `path`. Zero when fewer than two samples are found.
  pub fn correction_at(&self, path: &NodePath, position: DVec3) -> OffsetRotation {
    match self.find_nearest_pair(path, position) {
      Some((first, second)) => interpolate_offset(position, &first, &second),
      None => OffsetRotation::ZERO,
    }
  }

  /// Correction resolved from the root: the containing node if any,
  /// otherwise the root itself.
  pub fn correction(&self, position: DVec3) -> OffsetRotation {
    let path = self.find_node(position).unwrap_or_default();
    self.correction_at(&path, position)
  }

  /// Corrections for many positions in parallel. Output order matches input.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::corrections"))]
  pub fn corrections(&self, positions: &[DVec3]) -> Vec<OffsetRotation> {
    if positions.is_empty() {
      return Vec::new();
    }
    positions.par_iter().map(|&p| self.correction(p)).collect()
  }

  /// Every stored sample, depth-first in canonical octant order.
  pub fn samples(&self) -> Vec<Sample> {
    let mut out = Vec::new();
    self.root.collect_samples(&mut out);
    out
  }

  pub fn stats(&self) -> TreeStats {
    let mut stats = TreeStats::default();
    self.root.walk(&mut |_, node| {
      stats.nodes += 1;
      stats.samples += node.samples().len();
      stats.deepest = stats.deepest.max(node.depth());
      if node.is_leaf() {
        stats.leaves += 1;
      }
    });
    stats
  }

  /// Dump every node and its samples at debug level.
  pub fn log_tree(&self) {
    self.root.walk(&mut |path, node| {
      let bounds = node.bounds();
      log::debug!(
        "Node {:?} origin: {} extent: {} depth: {} samples: {}",
        path.steps(),
        bounds.origin,
        bounds.extent,
        bounds.depth,
        node.samples().len()
      );
      for sample in node.samples() {
        log::debug!(
          "  position: {} offset [yaw: {}, pitch: {}]",
          sample.position,
          sample.offset_yaw,
          sample.offset_pitch
        );
      }
    });
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
