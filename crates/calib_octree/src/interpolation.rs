//! Offset interpolation between two calibration samples.
//!
//! Each angular component is interpolated on its own along the segment that
//! joins the two sample positions: the query is projected onto the segment,
//! and the projected length over the segment length is the lerp factor.

use glam::DVec3;

use crate::types::{OffsetRotation, Sample};

/// Squared segment length below which two samples count as coincident.
pub const MIN_SEGMENT_LENGTH_SQUARED: f64 = 1.0e-8;

/// Relative slack on the segment length before a projection counts as
/// overshooting. Absorbs rounding for queries sitting on the far sample.
pub const OVERSHOOT_TOLERANCE: f64 = 1.0e-9;

/// Interpolate one angular component at `query`.
///
/// The sample with the smaller value is the segment start. The lerp factor is
/// the length of the query's projection onto the segment divided by the
/// segment length, so a query behind the start mirrors onto the segment.
///
/// Returns 0 when the samples coincide or the projection overshoots the
/// segment by more than [`OVERSHOOT_TOLERANCE`].
pub fn interpolate_component(
  query: DVec3,
  value_a: f64,
  value_b: f64,
  position_a: DVec3,
  position_b: DVec3,
) -> f64 {
  let (min_value, max_value, min_pos, max_pos) = if value_a < value_b {
    (value_a, value_b, position_a, position_b)
  } else {
    (value_b, value_a, position_b, position_a)
  };

  let direction = max_pos - min_pos;
  if direction.length_squared() < MIN_SEGMENT_LENGTH_SQUARED {
    log::debug!("Interpolation segment has zero length at {}", min_pos);
    return 0.0;
  }

  let direction_length = direction.length();
  let projection = (query - min_pos).project_onto_normalized(direction / direction_length);
  let projection_length = projection.length();

  if projection_length > direction_length * (1.0 + OVERSHOOT_TOLERANCE) {
    log::debug!(
      "Projection overshoots segment. projection: {} segment: {}",
      projection_length,
      direction_length
    );
    return 0.0;
  }

  let alpha = (projection_length / direction_length).min(1.0);
  min_value + alpha * (max_value - min_value)
}

/// Interpolate yaw and pitch at `query` from two samples.
pub fn interpolate_offset(query: DVec3, a: &Sample, b: &Sample) -> OffsetRotation {
  OffsetRotation {
    yaw: interpolate_component(query, a.offset_yaw, b.offset_yaw, a.position, b.position),
    pitch: interpolate_component(query, a.offset_pitch, b.offset_pitch, a.position, b.position),
  }
}

#[cfg(test)]
#[path = "interpolation_test.rs"]
mod interpolation_test;
