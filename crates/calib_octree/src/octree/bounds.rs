//! Axis-aligned node bounds stored as origin and half-extents.

use glam::DVec3;

/// Per-octant sign of the child origin offset, in canonical child order.
///
/// Top layer (+Z) first, then bottom layer (-Z); within a layer the order is
/// (-X,-Y), (+X,-Y), (-X,+Y), (+X,+Y).
pub const OCTANT_SIGNS: [[f64; 3]; 8] = [
	[-1.0, -1.0, 1.0],  // top left back
	[1.0, -1.0, 1.0],   // top right back
	[-1.0, 1.0, 1.0],   // top left front
	[1.0, 1.0, 1.0],    // top right front
	[-1.0, -1.0, -1.0], // bottom left back
	[1.0, -1.0, -1.0],  // bottom right back
	[-1.0, 1.0, -1.0],  // bottom left front
	[1.0, 1.0, -1.0],   // bottom right front
];

/// Bounding box of an octree node.
///
/// Covers `[origin - extent, origin + extent]` on every axis, closed at both
/// ends, so points on a face belong to the node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	/// Center of the box.
	pub origin: DVec3,
	/// Half-width per axis.
	pub extent: DVec3,
	/// Depth of the owning node (root = 0).
	pub depth: u32,
}

impl BoundingBox {
	/// Create a new box.
	///
	/// # Panics
	/// Debug-asserts that every extent component is non-negative.
	pub fn new(origin: DVec3, extent: DVec3, depth: u32) -> Self {
		debug_assert!(
			extent.x >= 0.0 && extent.y >= 0.0 && extent.z >= 0.0,
			"extent must be non-negative on all axes"
		);
		Self {
			origin,
			extent,
			depth,
		}
	}

	/// Minimum corner (inclusive).
	#[inline]
	pub fn min(&self) -> DVec3 {
		self.origin - self.extent
	}

	/// Maximum corner (inclusive).
	#[inline]
	pub fn max(&self) -> DVec3 {
		self.origin + self.extent
	}

	/// Check if this box contains a point, boundary included.
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		let min = self.min();
		let max = self.max();
		point.x >= min.x
			&& point.x <= max.x
			&& point.y >= min.y
			&& point.y <= max.y
			&& point.z >= min.z
			&& point.z <= max.z
	}

	/// Bounds of one child octant: half the extent, origin shifted by half
	/// the extent towards the octant, one level deeper.
	#[inline]
	pub fn octant(&self, octant: usize) -> Self {
		let half = self.extent * 0.5;
		let sign = DVec3::from_array(OCTANT_SIGNS[octant]);
		Self::new(self.origin + sign * half, half, self.depth + 1)
	}

	/// All 8 child bounds in canonical order.
	pub fn octant_boxes(&self) -> [Self; 8] {
		std::array::from_fn(|octant| self.octant(octant))
	}
}
