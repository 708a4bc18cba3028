//! OctreeNode - owned tree node holding calibration samples.
//!
//! A node is either a leaf with up to `max_elements` samples, or an internal
//! node with exactly 8 children in canonical octant order. Children are owned
//! by their parent; there is no upward link (see [`NodePath`]).

use glam::DVec3;

use super::{BoundingBox, NodePath, OctreeConfig};
use crate::types::Sample;

/// Octree node.
#[derive(Clone, Debug)]
pub struct OctreeNode {
  bounds: BoundingBox,
  samples: Vec<Sample>,
  children: Option<Box<[OctreeNode; 8]>>,
}

impl OctreeNode {
  /// Create an empty leaf covering `bounds`.
  pub fn new(bounds: BoundingBox) -> Self {
    Self {
      bounds,
      samples: Vec::new(),
      children: None,
    }
  }

  pub fn bounds(&self) -> &BoundingBox {
    &self.bounds
  }

  pub fn depth(&self) -> u32 {
    self.bounds.depth
  }

  /// Samples stored directly in this node, in insertion order.
  pub fn samples(&self) -> &[Sample] {
    &self.samples
  }

  /// Children in canonical octant order, or None for a leaf.
  pub fn children(&self) -> Option<&[OctreeNode; 8]> {
    self.children.as_deref()
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  #[inline]
  pub fn contains_point(&self, position: DVec3) -> bool {
    self.bounds.contains_point(position)
  }

  // ===========================================================================
  // Insertion
  // ===========================================================================

  /// Insert a sample into the subtree rooted at this node.
  ///
  /// Returns false if the position is out of range, the node is at or past
  /// `max_depth`, or the receiving leaf is full.
  pub fn insert(&mut self, config: &OctreeConfig, sample: Sample) -> bool {
    if self.bounds.depth >= config.max_depth || !self.contains_point(sample.position) {
      log::debug!(
        "Cannot insert into node. depth: {} position: {}",
        self.bounds.depth,
        sample.position
      );
      return false;
    }

    if self.insert_into_children(config, sample) {
      return true;
    }

    if !self.is_leaf() {
      // The receiving child already logged why. Internal nodes never hold
      // samples.
      return false;
    }

    if self.subdivide(config) {
      if self.insert_into_children(config, sample) {
        return true;
      }
      // Drop the 8 children created above; the node is a leaf again.
      self.children = None;
    }

    if self.samples.len() < config.max_elements {
      log::debug!(
        "Insert into node. depth: {} position: {}",
        self.bounds.depth,
        sample.position
      );
      self.samples.push(sample);
      return true;
    }

    log::warn!(
      "Overflow elements per node. max elements: {}",
      config.max_elements
    );
    false
  }

  fn insert_into_children(&mut self, config: &OctreeConfig, sample: Sample) -> bool {
    match self.children.as_deref_mut() {
      Some(children) => children.iter_mut().any(|child| child.insert(config, sample)),
      None => false,
    }
  }

  /// Create 8 empty children. Returns false if the node already has
  /// children or the children would exceed `max_depth`.
  fn subdivide(&mut self, config: &OctreeConfig) -> bool {
    if self.children.is_some() {
      return false;
    }
    if self.bounds.depth + 1 > config.max_depth {
      log::warn!("Overflow octree depth. max depth: {}", config.max_depth);
      return false;
    }

    log::debug!("Build children at depth {}", self.bounds.depth + 1);
    let children = self.bounds.octant_boxes().map(OctreeNode::new);
    self.children = Some(Box::new(children));
    true
  }

  // ===========================================================================
  // Queries
  // ===========================================================================

  /// Deepest node whose bounds contain `position`.
  ///
  /// Children are tried in canonical order; the first one that contains the
  /// position wins. Returns None if this node does not contain it.
  pub fn find_containing(&self, position: DVec3) -> Option<&OctreeNode> {
    if !self.contains_point(position) {
      return None;
    }
    self
      .children()
      .and_then(|children| children.iter().find_map(|child| child.find_containing(position)))
      .or(Some(self))
  }

  /// Same as [`find_containing`](Self::find_containing), returning the path
  /// relative to this node.
  pub fn find_containing_path(&self, position: DVec3) -> Option<NodePath> {
    if !self.contains_point(position) {
      return None;
    }
    let mut path = NodePath::root();
    let mut node = self;
    while let Some(children) = node.children() {
      let hit = children
        .iter()
        .enumerate()
        .find(|(_, child)| child.contains_point(position));
      match hit {
        Some((octant, child)) => {
          path = path.get_child(octant as u8)?;
          node = child;
        }
        None => break,
      }
    }
    Some(path)
  }

  /// Nearest sample to `position` in this subtree, skipping `excluding`.
  ///
  /// Only nodes containing `position` are searched. Children come first and
  /// the first child with a hit wins; otherwise this node's own samples are
  /// scanned by squared distance, ties going to the earlier sample. The
  /// exclusion skips one occurrence, so a duplicate of the excluded sample
  /// can still be returned.
  pub fn find_nearest(&self, position: DVec3, excluding: Option<&Sample>) -> Option<Sample> {
    if !self.contains_point(position) {
      return None;
    }

    if let Some(children) = self.children() {
      if let Some(found) = children
        .iter()
        .find_map(|child| child.find_nearest(position, excluding))
      {
        return Some(found);
      }
    }

    let mut skip = excluding;
    let mut best: Option<(Sample, f64)> = None;
    for sample in &self.samples {
      if skip.is_some_and(|excluded| excluded == sample) {
        skip = None;
        continue;
      }
      let distance = sample.distance_squared(position);
      if best.map_or(true, |(_, best_distance)| distance < best_distance) {
        best = Some((*sample, distance));
      }
    }
    best.map(|(sample, _)| sample)
  }

  // ===========================================================================
  // Traversal
  // ===========================================================================

  /// Resolve a path relative to this node.
  pub fn node(&self, path: &NodePath) -> Option<&OctreeNode> {
    let mut node = self;
    for &octant in path.steps() {
      node = node.children()?.get(octant as usize)?;
    }
    Some(node)
  }

  /// Mutable form of [`node`](Self::node).
  pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut OctreeNode> {
    let mut node = self;
    for &octant in path.steps() {
      node = node.children.as_deref_mut()?.get_mut(octant as usize)?;
    }
    Some(node)
  }

  /// Visit every node depth-first, parents before children, children in
  /// canonical order.
  pub fn walk<F>(&self, visit: &mut F)
  where
    F: FnMut(&NodePath, &OctreeNode),
  {
    self.walk_from(&NodePath::root(), visit);
  }

  fn walk_from<F>(&self, path: &NodePath, visit: &mut F)
  where
    F: FnMut(&NodePath, &OctreeNode),
  {
    visit(path, self);
    if let Some(children) = self.children() {
      for (octant, child) in children.iter().enumerate() {
        if let Some(child_path) = path.get_child(octant as u8) {
          child.walk_from(&child_path, visit);
        }
      }
    }
  }

  /// Append every stored sample to `out`, depth-first in canonical order.
  pub fn collect_samples(&self, out: &mut Vec<Sample>) {
    out.extend_from_slice(&self.samples);
    if let Some(children) = self.children() {
      for child in children.iter() {
        child.collect_samples(out);
      }
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
