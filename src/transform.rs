// src/transform.rs

//! Whole-lattice rigid transforms.
//!
//! These are pure passes over the sampled lattice: each produces a fresh point
//! cloud and leaves its input untouched. The frame driver feeds the previous
//! frame's cloud back in, so per-step rotations and slides accumulate across
//! frames without re-sampling the surface.

use crate::geometry::SurfacePoint;
use crate::math::{Rotation, Vector3};

/// Applies `rotation` to every point in the lattice.
pub fn rotate_lattice(points: &[SurfacePoint], rotation: &Rotation) -> Vec<SurfacePoint> {
    points.iter().map(|p| p.rotate(rotation)).collect()
}

/// Slides every point in the lattice by `offset`. See
/// [`SurfacePoint::translate`] for the normal-offset behavior this inherits.
pub fn translate_lattice(points: &[SurfacePoint], offset: Vector3) -> Vec<SurfacePoint> {
    points.iter().map(|p| p.translate(offset)).collect()
}
