//! Two-color indexed raster used for a single animation frame.

/// Palette index of the background color.
pub const BACKGROUND: u8 = 0;
/// Palette index of the foreground color.
pub const FOREGROUND: u8 = 1;

/// A square raster of palette indices, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    side: u16,
    pixels: Vec<u8>,
}

impl Frame {
    /// Allocate a `side` x `side` raster filled with the background color.
    #[must_use]
    pub fn new(side: u16) -> Self {
        let len = usize::from(side) * usize::from(side);
        Self { side, pixels: vec![BACKGROUND; len] }
    }

    /// Width and height of the raster in pixels.
    #[must_use]
    pub fn side(&self) -> u16 {
        self.side
    }

    /// Paint the pixel at (`x`, `y`) with the foreground color.
    ///
    /// Coordinates outside the raster are clamped to the nearest edge.
    pub fn plot(&mut self, x: i64, y: i64) {
        if self.side == 0 {
            return;
        }
        let max = i64::from(self.side) - 1;
        let (x, y) = (x.clamp(0, max), y.clamp(0, max));
        // both values are within 0..side after clamping
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = y as usize * usize::from(self.side) + x as usize;
        self.pixels[index] = FOREGROUND;
    }

    /// Number of foreground pixels.
    #[must_use]
    pub fn painted(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == FOREGROUND).count()
    }

    /// Row-major palette indices.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
