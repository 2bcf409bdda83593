// src/projection.rs

//! Perspective projection from camera space onto the glyph grid.
//!
//! The camera sits on the negative Z side of the screen; `distance_to_object`
//! pushes the solid away from the eye plane so the perspective divide never
//! sees a zero depth. That offset is fixed at construction time, which makes
//! "never divide by zero" a startup precondition instead of a per-frame check.

use anyhow::{Result, ensure};

use crate::math::Vector3;

/// A projected sample: the screen cell it lands in plus its reciprocal depth.
/// Larger `inv_z` means closer to the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub col: usize,
    pub row: usize,
    pub inv_z: f64,
}

/// Maps 3-D points to screen cells of a `width x height` grid.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    width: usize,
    height: usize,
    distance_to_eye: f64,
    distance_to_object: f64,
}

impl Projector {
    /// Creates a projector for the given grid and camera distances.
    ///
    /// `distance_to_object` must be strictly positive; callers assembling a
    /// scene must additionally keep it larger than the solid's outer radius so
    /// camera-space depth stays positive for every sample.
    pub fn new(
        width: usize,
        height: usize,
        distance_to_eye: f64,
        distance_to_object: f64,
    ) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "screen grid must be non-empty, got {}x{}",
            width,
            height
        );
        ensure!(
            distance_to_eye.is_finite() && distance_to_eye > 0.0,
            "eye-to-screen distance must be finite and positive, got {}",
            distance_to_eye
        );
        ensure!(
            distance_to_object.is_finite() && distance_to_object > 0.0,
            "screen-to-object distance must be finite and positive, got {}",
            distance_to_object
        );
        Ok(Projector {
            width,
            height,
            distance_to_eye,
            distance_to_object,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn distance_to_object(&self) -> f64 {
        self.distance_to_object
    }

    /// Projects a camera-space position onto the grid.
    ///
    /// Returns `None` when the cell falls outside `[0, width) x [0, height)`;
    /// points near the grid edge routinely project out and are simply skipped.
    /// The row axis is flipped: model Y grows upward, screen rows grow
    /// downward.
    pub fn project(&self, position: &Vector3) -> Option<Projection> {
        let depth = position.z + self.distance_to_object;
        let scale = self.distance_to_eye / depth;
        let col = self.width as isize / 2 + (scale * position.x) as isize;
        let row = self.height as isize / 2 - (scale * position.y) as isize;
        if col < 0 || row < 0 || col >= self.width as isize || row >= self.height as isize {
            return None;
        }
        Some(Projection {
            col: col as usize,
            row: row as usize,
            inv_z: 1.0 / depth,
        })
    }
}
