//! calib_octree - engine independent spatial index for camera calibration
//!
//! This crate stores camera calibration samples (a position plus the yaw and
//! pitch offset measured there) in a depth-bounded octree and interpolates a
//! correction for any live camera position from the two nearest samples.
//!
//! # Features
//!
//! - **Octree index**: incremental insertion with on-demand subdivision,
//!   per-leaf capacity, containing-node and nearest-sample queries
//! - **Offset interpolation**: per-axis linear interpolation along the
//!   segment joining the nearest pair
//! - **Sample files**: line-based text records for saving and reloading a
//!   calibration session
//! - **Controller**: cached containing node for consecutive camera queries
//!
//! # Example
//!
//! ```
//! use calib_octree::{CalibrationOctree, OctreeConfig};
//! use glam::DVec3;
//!
//! let mut tree = CalibrationOctree::new(OctreeConfig::default());
//! tree.insert(DVec3::new(0.0, 0.0, 0.0), 0.0, 1.0);
//! tree.insert(DVec3::new(10.0, 0.0, 0.0), 10.0, 3.0);
//!
//! let correction = tree.correction(DVec3::new(5.0, 0.0, 0.0));
//! assert!((correction.yaw - 5.0).abs() < 1e-9);
//! assert!((correction.pitch - 2.0).abs() < 1e-9);
//! ```

pub mod types;
pub use types::{OffsetRotation, Sample};

// Octree spatial index
pub mod octree;
pub use octree::{BoundingBox, CalibrationOctree, NodePath, OctreeConfig, OctreeNode, TreeStats};

// Nearest-pair interpolation
pub mod interpolation;
pub use interpolation::{interpolate_component, interpolate_offset};

// Sample file format
pub mod persistence;
pub use persistence::{PersistError, SampleStore};

// Runtime facade with cached containing node
pub mod controller;
pub use controller::{OctreeController, PendingInsert};
