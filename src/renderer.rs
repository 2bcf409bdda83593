// src/renderer.rs

//! The per-point rasterization pipeline: shade, project, depth-tested write.
//!
//! Two entry points cover the two render modes. `draw_points` consumes a
//! transformed point cloud; `draw_torus` is the fused path that walks the
//! `(theta, phi)` lattice and rotates each sample on the stack, never
//! materializing an intermediate array. Both run the same per-sample steps in
//! the same order, so for equal net rotations they produce identical grids.
//!
//! Order matters within a sample: brightness is validated before the depth
//! test, so an away-facing sample can never claim a depth cell and mask a
//! visible sample behind it.

use log::trace;

use crate::framebuffer::FrameBuffer;
use crate::geometry::{SurfacePoint, Torus};
use crate::math::{Rotation, Vector3};
use crate::projection::Projector;
use crate::shade::{Ramp, shade};

/// Stateless-per-frame renderer: camera projection, light direction, and the
/// brightness ramp.
#[derive(Debug, Clone)]
pub struct Renderer {
    projector: Projector,
    ramp: Ramp,
    light: Vector3,
}

impl Renderer {
    pub fn new(projector: Projector, ramp: Ramp, light: Vector3) -> Self {
        Renderer {
            projector,
            ramp,
            light,
        }
    }

    /// Composites one sample into the framebuffer. Invisible and out-of-grid
    /// samples are skipped locally; they never abort a frame.
    fn draw_point(&self, point: &SurfacePoint, fb: &mut FrameBuffer) -> bool {
        let Some(glyph) = shade(&point.normal, &self.light, &self.ramp) else {
            return false;
        };
        let Some(projection) = self.projector.project(&point.position) else {
            return false;
        };
        fb.write(projection.col, projection.row, glyph, projection.inv_z)
    }

    /// Composites a transformed point cloud into the framebuffer.
    pub fn draw_points(&self, points: &[SurfacePoint], fb: &mut FrameBuffer) {
        let mut drawn = 0usize;
        for point in points {
            if self.draw_point(point, fb) {
                drawn += 1;
            }
        }
        trace!("composited {} of {} samples", drawn, points.len());
    }

    /// Fused path: renders the torus at orientation `(angle_a, angle_b)`
    /// directly from its parametrization. The net rotation tilts about X by
    /// `angle_a` first, then spins about Z by `angle_b`, the same order the
    /// incremental point-cloud path uses.
    pub fn draw_torus(&self, torus: &Torus, angle_a: f64, angle_b: f64, fb: &mut FrameBuffer) {
        let rotation = Rotation::about_x(angle_a).compose(&Rotation::about_z(angle_b));
        let two_pi = 2.0 * std::f64::consts::PI;
        let mut drawn = 0usize;
        let mut total = 0usize;
        let mut theta = 0.0;
        while theta < two_pi {
            let mut phi = 0.0;
            while phi < two_pi {
                let point = torus.sample_at(theta, phi).rotate(&rotation);
                if self.draw_point(&point, fb) {
                    drawn += 1;
                }
                total += 1;
                phi += torus.phi_step();
            }
            theta += torus.theta_step();
        }
        trace!("fused pass composited {} of {} samples", drawn, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::rotate_lattice;
    use std::f64::consts::FRAC_1_SQRT_2;
    use test_log::test;

    fn grid_string(fb: &FrameBuffer) -> String {
        fb.rows()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn test_renderer(width: usize, height: usize) -> Renderer {
        Renderer::new(
            Projector::new(width, height, 30.0, 5.0).unwrap(),
            Ramp::default(),
            Vector3::new(0.0, FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        )
    }

    #[test]
    fn identity_frame_is_deterministic() {
        let torus = Torus::new(0.5, 1.0, 0.07, 0.02).unwrap();
        let renderer = test_renderer(48, 48);
        let points = torus.sample();

        let mut first = FrameBuffer::new(48, 48);
        renderer.draw_points(&points, &mut first);
        let mut second = FrameBuffer::new(48, 48);
        renderer.draw_points(&points, &mut second);

        let rendered = grid_string(&first);
        assert_eq!(rendered, grid_string(&second));
        assert!(
            rendered.chars().any(|g| g != ' ' && g != '\n'),
            "frame must not be empty"
        );
    }

    #[test]
    fn fused_path_matches_point_cloud_path() {
        let torus = Torus::new(0.5, 1.0, 0.3, 0.1).unwrap();
        let renderer = test_renderer(40, 24);
        let (angle_a, angle_b) = (0.8, 0.3);

        let rotation = Rotation::about_x(angle_a).compose(&Rotation::about_z(angle_b));
        let rotated = rotate_lattice(&torus.sample(), &rotation);
        let mut cloud_fb = FrameBuffer::new(40, 24);
        renderer.draw_points(&rotated, &mut cloud_fb);

        let mut fused_fb = FrameBuffer::new(40, 24);
        renderer.draw_torus(&torus, angle_a, angle_b, &mut fused_fb);

        assert_eq!(grid_string(&cloud_fb), grid_string(&fused_fb));
    }

    #[test]
    fn away_facing_samples_leave_no_depth_footprint() {
        // A near away-facing sample followed by a far visible one in the same
        // cell: the visible sample must still land.
        let projector = Projector::new(16, 16, 30.0, 5.0).unwrap();
        let renderer = Renderer::new(projector, Ramp::default(), Vector3::new(0.0, 1.0, 0.0));
        let mut fb = FrameBuffer::new(16, 16);

        let invisible_near = SurfacePoint {
            position: Vector3::new(0.0, 0.0, -1.0),
            normal: Vector3::new(0.0, -1.0, 0.0),
        };
        let visible_far = SurfacePoint {
            position: Vector3::new(0.0, 0.0, 1.0),
            normal: Vector3::new(0.0, 1.0, 0.0),
        };
        renderer.draw_points(&[invisible_near, visible_far], &mut fb);
        assert_eq!(fb.glyph_at(8, 8), '@');
    }
}
