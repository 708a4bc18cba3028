//! Octree module for spatial indexing of calibration samples.
//!
//! The tree is explicit and owned top-down: each internal node owns exactly
//! 8 children, leaves own their samples. Nodes are addressed from outside
//! with [`NodePath`] handles instead of references.
//!
//! # Depth Convention
//!
//! Depth 0 = root (whole calibration volume), each level halves the extent.
//!
//! ```text
//! Extent at depth d = root_extent / 2^d
//! ```
//!
//! A node at `max_depth` rejects every insert, so samples settle one level
//! above it.
//!
//! # Module Structure
//!
//! - [`bounds`]: `BoundingBox` - origin/extent box and octant math
//! - [`config`]: `OctreeConfig` - per-tree bounds and limits
//! - [`node`]: `OctreeNode` - insert, containment and nearest queries
//! - [`path`]: `NodePath` - non-owning node handle
//! - [`tree`]: `CalibrationOctree` - root plus config, the public entry point

pub mod bounds;
pub mod config;
pub mod node;
pub mod path;
pub mod tree;

// Re-exports
pub use bounds::{BoundingBox, OCTANT_SIGNS};
pub use config::{ConfigError, OctreeConfig};
pub use node::OctreeNode;
pub use path::NodePath;
pub use tree::{CalibrationOctree, TreeStats};
