// src/config.rs

//! Configuration for the torus animation.
//!
//! Every tunable the renderer and driver consume lives here as a named field
//! with a documented effect, grouped into logical sections. The whole tree can
//! be deserialized from a JSON file; every field has a default, and the
//! zero-config defaults reproduce the classic 100x40 bordered spinning donut.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::math::Vector3;

/// Root configuration tree.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Glyph grid dimensions and framing.
    pub screen: ScreenConfig,
    /// Perspective camera distances.
    pub camera: CameraConfig,
    /// Torus geometry and sampling resolution.
    pub torus: TorusConfig,
    /// Light direction and brightness ramp.
    pub shading: ShadingConfig,
    /// Render mode, frame pacing, and the animation schedule.
    pub animation: AnimationConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Validates cross-section invariants that individual constructors cannot
    /// see. Structural errors here must prevent the program from starting.
    pub fn validate(&self) -> Result<()> {
        let outer_radius = self.torus.tube_radius + self.torus.ring_radius;
        ensure!(
            self.camera.distance_to_object > outer_radius,
            "screen-to-object distance {} must exceed the torus outer radius {} \
             so the solid stays in front of the eye plane",
            self.camera.distance_to_object,
            outer_radius
        );
        // The schedule is fully known here, so the eye-plane invariant is
        // checked against the nearest point the slides ever drive the solid
        // to, not just its starting position.
        let mut z_offset = 0.0_f64;
        let mut nearest_z = 0.0_f64;
        for phase in &self.animation.phases {
            if let PhaseOp::Slide { offset } = phase.op {
                z_offset += offset.z * f64::from(phase.frames);
                nearest_z = nearest_z.min(z_offset);
            }
        }
        ensure!(
            self.camera.distance_to_object + nearest_z > outer_radius,
            "slide schedule drives the solid to z {} where screen-to-object \
             distance {} no longer clears the torus outer radius {}; the solid \
             would cross the eye plane mid-run",
            nearest_z,
            self.camera.distance_to_object,
            outer_radius
        );
        ensure!(
            !self.animation.phases.is_empty(),
            "animation schedule must contain at least one phase"
        );
        for (i, phase) in self.animation.phases.iter().enumerate() {
            ensure!(
                phase.frames > 0,
                "animation phase {} has a zero frame count",
                i
            );
            if self.animation.mode == RenderMode::Fused {
                if let PhaseOp::Slide { .. } = phase.op {
                    bail!(
                        "animation phase {} is a slide, which the fused render \
                         mode cannot express; use point-cloud mode",
                        i
                    );
                }
            }
        }
        let light_len = self.shading.light.length();
        ensure!(
            light_len.is_finite() && light_len > 0.0,
            "light direction must be a nonzero finite vector"
        );
        if (light_len - 1.0).abs() > 1e-6 {
            log::warn!(
                "light direction {:?} is not unit length ({}); brightness will be scaled",
                self.shading.light,
                light_len
            );
        }
        Ok(())
    }
}

/// Glyph grid dimensions and framing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Grid width in glyph cells.
    pub width: usize,
    /// Grid height in glyph cells.
    pub height: usize,
    /// Wrap each frame in a one-character border.
    pub border: bool,
    /// Emit the ANSI cursor-home sequence before each frame so frames
    /// overwrite in place.
    pub cursor_home: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            width: 100,
            height: 40,
            border: true,
            cursor_home: true,
        }
    }
}

/// Perspective camera distances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye-to-screen distance. Scales the projected size of the solid.
    pub distance_to_eye: f64,
    /// Screen-to-object distance, added to every sample's Z before the
    /// perspective divide. Must keep the whole solid in front of the eye.
    pub distance_to_object: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            distance_to_eye: 60.0,
            distance_to_object: 5.0,
        }
    }
}

/// Torus geometry and sampling resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TorusConfig {
    /// Radius of the tube cross-section.
    pub tube_radius: f64,
    /// Radius of the ring the tube sweeps around.
    pub ring_radius: f64,
    /// Angular step for the tube cross-section angle.
    pub theta_step: f64,
    /// Angular step for the ring sweep angle.
    pub phi_step: f64,
}

impl Default for TorusConfig {
    fn default() -> Self {
        TorusConfig {
            tube_radius: 0.5,
            ring_radius: 1.0,
            theta_step: 0.07,
            phi_step: 0.02,
        }
    }
}

/// Light direction and brightness ramp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Direction toward the light source. Should be unit length; brightness
    /// is the dot product of a sample's normal with this vector.
    pub light: Vector3,
    /// Ordered dim-to-bright glyph ramp.
    pub ramp: String,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        ShadingConfig {
            light: Vector3::new(
                0.0,
                std::f64::consts::FRAC_1_SQRT_2,
                -std::f64::consts::FRAC_1_SQRT_2,
            ),
            ramp: crate::shade::DEFAULT_RAMP.iter().collect(),
        }
    }
}

/// Which rendering path the driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Keep a transformed point cloud and advance it incrementally each
    /// frame. Supports both spin and slide phases.
    PointCloud,
    /// Recompute every sample from the parametrization and the accumulated
    /// angles each frame, with no intermediate point array. Spin phases only.
    Fused,
}

/// One step of the animation schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseOp {
    /// Rotate by `a_step` about X and `b_step` about Z each frame (tilt
    /// first, then spin).
    Spin { a_step: f64, b_step: f64 },
    /// Slide rigidly by `offset` each frame.
    Slide { offset: Vector3 },
}

/// An operation repeated for a fixed number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub op: PhaseOp,
    /// How many frames this phase runs.
    pub frames: u32,
}

/// Render mode, frame pacing, and the animation schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Rendering path.
    pub mode: RenderMode,
    /// Delay between frames, in milliseconds.
    pub frame_delay_ms: u64,
    /// The schedule: phases run in order; the animation exits when the last
    /// one finishes.
    pub phases: Vec<Phase>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        // One continuous spin long enough for the slower angle to sweep a
        // full turn.
        let a_step = 0.08;
        let b_step = 0.03;
        let frames = (2.0 * std::f64::consts::PI / b_step).ceil() as u32;
        AnimationConfig {
            mode: RenderMode::PointCloud,
            frame_delay_ms: 15,
            phases: vec![Phase {
                op: PhaseOp::Spin { a_step, b_step },
                frames,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn object_must_stay_in_front_of_the_eye() {
        let mut config = Config::default();
        config.camera.distance_to_object = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn slide_schedule_must_not_cross_the_eye_plane() {
        // 150 frames of z -0.05 drift the solid 7.5 toward the eye, past the
        // 5.0 camera offset; that must be caught at startup, not discovered
        // as blank frames mid-run.
        let mut config = Config::default();
        config.animation.phases.push(Phase {
            op: PhaseOp::Slide {
                offset: Vector3::new(0.0, 0.0, -0.05),
            },
            frames: 150,
        });
        assert!(config.validate().is_err());

        // A shallow drift that keeps the solid clear of the eye plane is fine,
        // and a later slide back out does not excuse the closest approach.
        config.animation.phases.pop();
        config.animation.phases.push(Phase {
            op: PhaseOp::Slide {
                offset: Vector3::new(0.0, 0.0, -0.05),
            },
            frames: 20,
        });
        config.validate().unwrap();
        config.animation.phases.push(Phase {
            op: PhaseOp::Slide {
                offset: Vector3::new(0.0, 0.0, -0.05),
            },
            frames: 130,
        });
        config.animation.phases.push(Phase {
            op: PhaseOp::Slide {
                offset: Vector3::new(0.0, 0.0, 0.05),
            },
            frames: 150,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_schedule_is_rejected() {
        let mut config = Config::default();
        config.animation.phases.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_frame_phase_is_rejected() {
        let mut config = Config::default();
        config.animation.phases[0].frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn fused_mode_rejects_slide_phases() {
        let mut config = Config::default();
        config.animation.mode = RenderMode::Fused;
        config.animation.phases.push(Phase {
            op: PhaseOp::Slide {
                offset: Vector3::new(0.05, 0.0, 0.0),
            },
            frames: 50,
        });
        assert!(config.validate().is_err());
        config.animation.phases.pop();
        config.validate().unwrap();
    }

    #[test]
    fn zero_light_is_rejected() {
        let mut config = Config::default();
        config.shading.light = Vector3::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_document_fills_in_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "screen": { "width": 48, "height": 48, "border": false },
                "animation": {
                    "mode": "fused",
                    "phases": [
                        { "op": { "spin": { "a_step": 0.08, "b_step": 0.03 } }, "frames": 20 }
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.screen.width, 48);
        assert!(!config.screen.border);
        assert!(config.screen.cursor_home, "unset field takes its default");
        assert_eq!(config.animation.mode, RenderMode::Fused);
        assert_eq!(config.animation.phases.len(), 1);
        assert_eq!(config.camera.distance_to_eye, 60.0);
        config.validate().unwrap();
    }

    #[test]
    fn choreography_demo_parses_and_opens_with_a_static_frame() {
        let config: Config = serde_json::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/demos/choreography.json"
        )))
        .unwrap();
        config.validate().unwrap();
        // The scripted sequence shows the solid once, unrotated, before the
        // first spin phase.
        assert_eq!(
            config.animation.phases[0],
            Phase {
                op: PhaseOp::Spin {
                    a_step: 0.0,
                    b_step: 0.0
                },
                frames: 1
            }
        );
    }

    #[test]
    fn fused_demo_parses_and_validates() {
        let config: Config = serde_json::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/demos/fused.json"
        )))
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.animation.mode, RenderMode::Fused);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(back.screen.width, config.screen.width);
        assert_eq!(back.animation.phases, config.animation.phases);
        assert_eq!(back.shading.ramp, config.shading.ramp);
    }
}
