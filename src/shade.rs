// src/shade.rs

//! Brightness computation and glyph quantization.
//!
//! A sample's brightness is the dot product of its unit normal with the light
//! direction. Negative brightness means the surface faces away from the light:
//! the sample is invisible and must be discarded before it ever touches the
//! depth buffer, otherwise an invisible point could claim a cell and block a
//! dimmer visible one behind it.

use anyhow::{Result, ensure};
use once_cell::sync::Lazy;

use crate::math::Vector3;

/// Default glyph ramp, darkest to brightest.
pub static DEFAULT_RAMP: Lazy<Vec<char>> = Lazy::new(|| ".,-~:;=!*#$@".chars().collect());

/// An ordered ramp of glyphs approximating a grayscale intensity scale.
#[derive(Debug, Clone)]
pub struct Ramp {
    glyphs: Vec<char>,
}

impl Ramp {
    /// Builds a ramp from an ordered dim-to-bright glyph string. At least two
    /// glyphs are required for the linear binning to mean anything.
    pub fn new(glyphs: &str) -> Result<Self> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        ensure!(
            glyphs.len() >= 2,
            "brightness ramp needs at least 2 glyphs, got {}",
            glyphs.len()
        );
        Ok(Ramp { glyphs })
    }

    /// Quantizes a brightness in `[0, 1]` to a glyph by linear binning.
    /// Values above 1 (numerical overshoot) clamp to the brightest glyph.
    pub fn glyph_for(&self, brightness: f64) -> char {
        let last = self.glyphs.len() - 1;
        let index = (brightness * last as f64) as usize;
        self.glyphs[index.min(last)]
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Ramp {
            glyphs: DEFAULT_RAMP.clone(),
        }
    }
}

/// Shades a sample: returns the glyph for its brightness, or `None` when the
/// normal faces away from the light.
pub fn shade(normal: &Vector3, light: &Vector3, ramp: &Ramp) -> Option<char> {
    let brightness = normal.dot(light);
    if brightness < 0.0 {
        return None;
    }
    Some(ramp.glyph_for(brightness))
}
