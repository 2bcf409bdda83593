// src/geometry.rs

//! Torus surface sampling.
//!
//! A torus is parametrized by two angles: `theta` walks the tube cross-section
//! and `phi` sweeps that circle around the ring. Sampling produces a fixed
//! lattice of `SurfacePoint`s in object space. The lattice never changes over
//! the life of the program; only the rigid transform applied to it does, so it
//! is sampled once and reused for every frame.

use std::f64::consts::PI;

use anyhow::{Result, ensure};

use crate::math::{Rotation, Vector3};

/// One sample of the torus surface: a position and the outward unit normal at
/// that position. Normals are unit length by construction (they are built from
/// sines and cosines that form a unit vector).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub position: Vector3,
    pub normal: Vector3,
}

impl SurfacePoint {
    /// Rotates position and normal independently. Rotation is linear, so
    /// applying it to the normal directly is exact.
    pub fn rotate(&self, rotation: &Rotation) -> SurfacePoint {
        SurfacePoint {
            position: rotation.apply(&self.position),
            normal: rotation.apply(&self.normal),
        }
    }

    /// Slides the point by `offset`, adding the same offset to the normal.
    ///
    /// Offsetting the normal is not a rigid-body transform. It is kept because
    /// the rendered effect depends on it: the shading stays locked to a global
    /// light-relative orientation while the solid drifts, so highlights sweep
    /// across the surface during slide phases.
    pub fn translate(&self, offset: Vector3) -> SurfacePoint {
        SurfacePoint {
            position: self.position.add(&offset),
            normal: self.normal.add(&offset),
        }
    }
}

/// Torus geometry plus the angular sampling resolution.
#[derive(Debug, Clone, Copy)]
pub struct Torus {
    tube_radius: f64,
    ring_radius: f64,
    theta_step: f64,
    phi_step: f64,
}

impl Torus {
    /// Creates a torus sampler.
    ///
    /// All four parameters must be finite and strictly positive; a zero or
    /// negative step would make sampling empty or non-terminating, so that is
    /// rejected here rather than discovered mid-frame.
    pub fn new(tube_radius: f64, ring_radius: f64, theta_step: f64, phi_step: f64) -> Result<Self> {
        ensure!(
            tube_radius.is_finite() && tube_radius > 0.0,
            "tube radius must be finite and positive, got {}",
            tube_radius
        );
        ensure!(
            ring_radius.is_finite() && ring_radius > 0.0,
            "ring radius must be finite and positive, got {}",
            ring_radius
        );
        ensure!(
            theta_step.is_finite() && theta_step > 0.0,
            "theta step must be finite and positive, got {}",
            theta_step
        );
        ensure!(
            phi_step.is_finite() && phi_step > 0.0,
            "phi step must be finite and positive, got {}",
            phi_step
        );
        Ok(Torus {
            tube_radius,
            ring_radius,
            theta_step,
            phi_step,
        })
    }

    pub fn theta_step(&self) -> f64 {
        self.theta_step
    }

    pub fn phi_step(&self) -> f64 {
        self.phi_step
    }

    /// Computes the sample at a single `(theta, phi)` parameter pair.
    pub fn sample_at(&self, theta: f64, phi: f64) -> SurfacePoint {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        // Tube cross-section circle, before sweeping around the ring.
        let circle_x = self.ring_radius + self.tube_radius * cos_theta;
        let circle_y = self.tube_radius * sin_theta;
        SurfacePoint {
            position: Vector3::new(circle_x * cos_phi, circle_y, circle_x * sin_phi),
            normal: Vector3::new(cos_theta * cos_phi, sin_theta, cos_theta * sin_phi),
        }
    }

    /// Samples the full lattice: `theta` from 0 to 2pi in `theta_step`
    /// increments and, for each, `phi` from 0 to 2pi in `phi_step` increments.
    pub fn sample(&self) -> Vec<SurfacePoint> {
        let theta_count = (2.0 * PI / self.theta_step).ceil() as usize;
        let phi_count = (2.0 * PI / self.phi_step).ceil() as usize;
        let mut points = Vec::with_capacity(theta_count * phi_count);
        let mut theta = 0.0;
        while theta < 2.0 * PI {
            let mut phi = 0.0;
            while phi < 2.0 * PI {
                points.push(self.sample_at(theta, phi));
                phi += self.phi_step;
            }
            theta += self.theta_step;
        }
        log::debug!(
            "sampled torus lattice: {} points ({} theta x {} phi)",
            points.len(),
            theta_count,
            phi_count
        );
        points
    }
}
