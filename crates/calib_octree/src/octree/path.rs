//! NodePath - non-owning handle to a node, as octant steps from the root.
//!
//! Nodes never point at their parent. Upward traversal is done on the path
//! instead, so a handle can be held across mutations without borrowing the
//! tree.

use smallvec::SmallVec;

/// Path from the root to a node.
///
/// Each step is an octant index 0-7 in canonical child order. The empty path
/// is the root. Depth equals the number of steps.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct NodePath {
  steps: SmallVec<[u8; 8]>,
}

impl NodePath {
  /// Path to the root node.
  pub fn root() -> Self {
    Self::default()
  }

  /// Build a path from explicit octant steps.
  ///
  /// Returns None if any step is not a valid octant.
  pub fn from_steps(steps: &[u8]) -> Option<Self> {
    if steps.iter().any(|&octant| octant >= 8) {
      return None;
    }
    Some(Self {
      steps: SmallVec::from_slice(steps),
    })
  }

  /// Octant steps from the root.
  pub fn steps(&self) -> &[u8] {
    &self.steps
  }

  /// Depth of the addressed node (root = 0).
  pub fn depth(&self) -> u32 {
    self.steps.len() as u32
  }

  pub fn is_root(&self) -> bool {
    self.steps.is_empty()
  }

  /// Get child path (one level deeper).
  ///
  /// Returns None for an invalid octant.
  pub fn get_child(&self, octant: u8) -> Option<Self> {
    if octant >= 8 {
      return None;
    }
    let mut steps = self.steps.clone();
    steps.push(octant);
    Some(Self { steps })
  }

  /// Get parent path (one level up).
  ///
  /// Returns None at the root.
  pub fn get_parent(&self) -> Option<Self> {
    if self.steps.is_empty() {
      return None;
    }
    let mut steps = self.steps.clone();
    steps.pop();
    Some(Self { steps })
  }

  /// True if `self` is `other` or one of its ancestors.
  pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
    other.steps.starts_with(&self.steps)
  }
}

#[cfg(test)]
#[path = "path_test.rs"]
mod path_test;
