// src/framebuffer.rs

//! The glyph framebuffer and its reciprocal-depth z-buffer.
//!
//! Both grids are flat row-major vectors. A depth of zero means "nothing drawn
//! here this frame", so any finite positive reciprocal depth wins an empty
//! cell. Within a frame the stored glyph always belongs to the sample with the
//! largest reciprocal depth written so far; the test is strict, so an
//! equal-depth write loses to the first writer.

use log::warn;

/// Fill character for cells no sample landed in.
pub const BLANK_GLYPH: char = ' ';

/// A `width x height` grid of glyphs plus a parallel grid of reciprocal
/// depths.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    glyphs: Vec<char>,
    depth: Vec<f64>,
}

impl FrameBuffer {
    /// Allocates a cleared framebuffer. Dimensions are validated upstream by
    /// the projector sharing them.
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            glyphs: vec![BLANK_GLYPH; width * height],
            depth: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Depth-tested write: stores `glyph` and `inv_z` at `(col, row)` if
    /// `inv_z` is strictly larger than the depth already there. Returns
    /// whether the write landed.
    ///
    /// Coordinates outside the grid are skipped with a warning; the projector
    /// rejects them before they reach this point, so a hit here indicates a
    /// caller bypassing projection.
    pub fn write(&mut self, col: usize, row: usize, glyph: char, inv_z: f64) -> bool {
        if col >= self.width || row >= self.height {
            warn!(
                "framebuffer write outside {}x{} grid at ({}, {}); dropping",
                self.width, self.height, col, row
            );
            return false;
        }
        let index = row * self.width + col;
        if inv_z <= self.depth[index] {
            return false;
        }
        self.depth[index] = inv_z;
        self.glyphs[index] = glyph;
        true
    }

    /// Resets both grids in place. Called between frames, never mid-frame.
    pub fn clear(&mut self) {
        self.glyphs.fill(BLANK_GLYPH);
        self.depth.fill(0.0);
    }

    /// Row-major view of the glyph grid, one slice per screen row.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.glyphs.chunks_exact(self.width)
    }

    #[cfg(test)]
    pub(crate) fn glyph_at(&self, col: usize, row: usize) -> char {
        self.glyphs[row * self.width + col]
    }

    #[cfg(test)]
    pub(crate) fn depth_at(&self, col: usize, row: usize) -> f64 {
        self.depth[row * self.width + col]
    }
}
