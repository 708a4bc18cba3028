//! OctreeController - runtime facade keyed by a live camera position.
//!
//! Owns one tree and remembers the node that last contained the camera, so
//! consecutive queries from nearby positions skip the descent from the root.

use glam::DVec3;

use crate::octree::{CalibrationOctree, NodePath, OctreeConfig};
use crate::persistence::{PersistError, SampleStore};
use crate::types::{OffsetRotation, Sample};

/// Offsets staged for the next [`OctreeController::insert_pending`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PendingInsert {
  /// One-shot trigger, cleared by the insert.
  pub armed: bool,
  pub offset_yaw: f64,
  pub offset_pitch: f64,
}

/// Offsets closer to zero than this count as "no offset".
const OFFSET_TOLERANCE: f64 = 1.0e-8;

pub struct OctreeController {
  tree: CalibrationOctree,
  current: Option<NodePath>,
  /// Staged insert, consumed by [`insert_pending`](Self::insert_pending).
  pub pending: PendingInsert,
}

impl OctreeController {
  pub fn new(config: OctreeConfig) -> Self {
    Self::with_tree(CalibrationOctree::new(config))
  }

  pub fn with_tree(tree: CalibrationOctree) -> Self {
    Self {
      tree,
      current: None,
      pending: PendingInsert::default(),
    }
  }

  pub fn tree(&self) -> &CalibrationOctree {
    &self.tree
  }

  /// Cached node from the last successful [`find_octree_node`](Self::find_octree_node).
  pub fn current_node(&self) -> Option<&NodePath> {
    self.current.as_ref()
  }

  /// Make sure the cached node contains `position`.
  ///
  /// The cached node is kept while it still contains the position, even if
  /// it has since been subdivided. Otherwise the containing node is resolved
  /// from the root. Returns false if the position is outside the tree.
  pub fn find_octree_node(&mut self, position: DVec3) -> bool {
    if let Some(node) = self.current.as_ref().and_then(|path| self.tree.node(path)) {
      if node.contains_point(position) {
        return true;
      }
    }

    match self.tree.find_node(position) {
      Some(path) => {
        self.current = Some(path);
        true
      }
      None => false,
    }
  }

  /// Insert through the cached node when it contains `position`, otherwise
  /// through the root.
  pub fn insert_sample(&mut self, position: DVec3, offset_yaw: f64, offset_pitch: f64) -> bool {
    let sample = Sample::new(position, offset_yaw, offset_pitch);
    if self.find_octree_node(position) {
      if let Some(path) = self.current.clone() {
        return self.tree.insert_at(&path, sample);
      }
    }
    self.tree.insert_sample(sample)
  }

  /// Insert a bare position with zero offsets.
  pub fn insert_position(&mut self, position: DVec3) -> bool {
    self.insert_sample(position, 0.0, 0.0)
  }

  /// Consume the staged insert at `position`.
  ///
  /// Does nothing and returns false unless armed. Staged offsets are
  /// inserted and reset when either is non-zero; otherwise a bare position
  /// is inserted.
  pub fn insert_pending(&mut self, position: DVec3) -> bool {
    if !self.pending.armed {
      return false;
    }
    self.pending.armed = false;

    let PendingInsert {
      offset_yaw,
      offset_pitch,
      ..
    } = self.pending;
    if offset_yaw.abs() > OFFSET_TOLERANCE || offset_pitch.abs() > OFFSET_TOLERANCE {
      self.pending.offset_yaw = 0.0;
      self.pending.offset_pitch = 0.0;
      return self.insert_sample(position, offset_yaw, offset_pitch);
    }

    self.insert_position(position)
  }

  /// Correction at `position`, searched in the cached node if it contains
  /// the position, otherwise in the root.
  pub fn correction_from_root(&mut self, position: DVec3) -> OffsetRotation {
    let path = if self.find_octree_node(position) {
      self.current.clone().unwrap_or_default()
    } else {
      NodePath::root()
    };
    self.correction_from_node(position, &path)
  }

  /// Correction at `position` from the nearest pair within the node at
  /// `path`. Zero if fewer than two samples are found there.
  pub fn correction_from_node(&self, position: DVec3, path: &NodePath) -> OffsetRotation {
    self.tree.correction_at(path, position)
  }

  /// Insert samples through the root, returning how many were accepted.
  pub fn insert_samples<I>(&mut self, samples: I) -> usize
  where
    I: IntoIterator<Item = Sample>,
  {
    self.tree.build_with_samples(samples)
  }

  /// Write every stored sample to `store`.
  pub fn save(&self, store: &SampleStore) -> Result<(), PersistError> {
    store.save(&self.tree.samples())
  }

  /// Insert every sample from `store`, returning how many were accepted.
  pub fn load(&mut self, store: &SampleStore) -> Result<usize, PersistError> {
    let samples = store.load()?;
    Ok(self.insert_samples(samples))
  }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;
