//! Core data types for calibration samples and angular corrections.

use glam::DVec3;

/// A calibration point: where the camera was, and the yaw/pitch offset that
/// corrected it there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
  /// Camera position in tree space.
  pub position: DVec3,
  /// Yaw correction in degrees.
  pub offset_yaw: f64,
  /// Pitch correction in degrees.
  pub offset_pitch: f64,
}

impl Sample {
  /// Create a sample at `position` with the given offsets.
  pub fn new(position: DVec3, offset_yaw: f64, offset_pitch: f64) -> Self {
    Self {
      position,
      offset_yaw,
      offset_pitch,
    }
  }

  /// Sample with zero offsets (a bare recorded position).
  pub fn at(position: DVec3) -> Self {
    Self::new(position, 0.0, 0.0)
  }

  /// Squared Euclidean distance from this sample to `point`.
  #[inline]
  pub fn distance_squared(&self, point: DVec3) -> f64 {
    self.position.distance_squared(point)
  }
}

/// Yaw/pitch correction produced by interpolation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OffsetRotation {
  pub yaw: f64,
  pub pitch: f64,
}

impl OffsetRotation {
  /// Identity correction, returned when no interpolation is possible.
  pub const ZERO: Self = Self {
    yaw: 0.0,
    pitch: 0.0,
  };

  pub fn new(yaw: f64, pitch: f64) -> Self {
    Self { yaw, pitch }
  }

  /// True if both components are within `tolerance` of zero.
  #[inline]
  pub fn is_nearly_zero(&self, tolerance: f64) -> bool {
    self.yaw.abs() <= tolerance && self.pitch.abs() <= tolerance
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
