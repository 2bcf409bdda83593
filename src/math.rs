// src/math.rs

//! 3-component vector and 3x3 rotation-matrix algebra for the render pipeline.
//!
//! `Rotation` uses the row-vector convention: `apply(v)` computes `v * M`, and
//! `a.compose(b)` is the matrix product `a * b`, so `apply(compose(a, b))`
//! rotates by `a` first and then by `b`. All generators produce orthonormal
//! matrices, so every composition preserves vector length.

use serde::{Deserialize, Serialize};

/// A 3-dimensional vector. Also used for directions (light source) and
/// per-frame slide offsets, which is why it is deserializable from config.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// Standard inner product.
    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

/// A 3x3 orthonormal rotation matrix.
///
/// Invariant: only constructed from the axis generators below and their
/// compositions, so the matrix is always orthonormal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation(pub [[f64; 3]; 3]);

impl Rotation {
    pub const IDENTITY: Rotation = Rotation([
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ]);

    /// Rotation about the X axis by `angle` radians.
    pub fn about_x(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Rotation([
            [1.0, 0.0, 0.0],
            [0.0, cos, sin],
            [0.0, -sin, cos],
        ])
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn about_y(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Rotation([
            [cos, 0.0, -sin],
            [0.0, 1.0, 0.0],
            [sin, 0.0, cos],
        ])
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn about_z(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Rotation([
            [cos, sin, 0.0],
            [-sin, cos, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Composes two rotations into one: the result applies `self` first,
    /// then `other`. Matrix composition does not commute, so the order here
    /// is load-bearing for the animation (tilt before spin).
    pub fn compose(&self, other: &Rotation) -> Rotation {
        let a = &self.0;
        let b = &other.0;
        let mut m = [[0.0f64; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Rotation(m)
    }

    /// Applies the rotation to a vector (row-vector convention, `v * M`).
    pub fn apply(&self, v: &Vector3) -> Vector3 {
        let m = &self.0;
        Vector3 {
            x: m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
            y: m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
            z: m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
        }
    }
}
