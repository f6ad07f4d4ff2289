//! Scrolling ground strip.

/// The ground, rendered as two tiled segments that wrap to create an
/// infinite horizontal scroll. Lives for the whole process.
#[derive(Clone, Debug)]
pub struct Base {
    /// Blit y of the strip
    pub y: f32,
    /// X offset of the first tile
    pub x1: f32,
    /// X offset of the second tile
    pub x2: f32,
    /// Tile width in pixels
    pub width: f32,
}

impl Base {
    /// Create the strip at the given y with the given tile width
    pub fn new(y: f32, width: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: width,
            width,
        }
    }

    /// Scroll both tiles left; a tile that has fully left the screen wraps
    /// to exactly one tile width behind the other.
    pub fn advance(&mut self, velocity: f32) {
        self.x1 -= velocity;
        self.x2 -= velocity;

        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEL: f32 = 5.0;
    const WIDTH: f32 = 672.0;

    #[test]
    fn test_tiles_start_adjacent() {
        let base = Base::new(730.0, WIDTH);
        assert_eq!(base.x1, 0.0);
        assert_eq!(base.x2, WIDTH);
    }

    #[test]
    fn test_wrap_is_exact() {
        let mut base = Base::new(730.0, WIDTH);

        // Advance until x1 + WIDTH < 0 triggers the wrap
        let mut wrapped = false;
        for _ in 0..1000 {
            let x2_before = base.x2 - VEL;
            let would_wrap = base.x1 - VEL + base.width < 0.0;
            base.advance(VEL);
            if would_wrap {
                assert_eq!(base.x1, x2_before + WIDTH);
                wrapped = true;
                break;
            }
        }
        assert!(wrapped, "tile never wrapped");
    }

    #[test]
    fn test_tiles_stay_one_width_apart() {
        let mut base = Base::new(730.0, WIDTH);

        for _ in 0..2000 {
            base.advance(VEL);
            let spacing = (base.x1 - base.x2).abs();
            assert_eq!(spacing, WIDTH);
        }
    }
}
