//! Pipe pair: lifecycle, movement and mask-based collision.

use crate::bird::Bird;
use crate::config::PipeConfig;
use crate::sprites::SpriteBank;
use rand::Rng;

/// A pair of pipes sharing one x position and a randomly sampled gap.
///
/// `gap_top` is the y coordinate where the gap begins; the top pipe's sprite
/// is blitted at `top` (usually negative, hanging off-screen) and the bottom
/// pipe at `bottom`.
#[derive(Clone, Debug)]
pub struct Pipe {
    /// Horizontal position of both pipes
    pub x: f32,
    /// Y where the gap begins (bottom edge of the top pipe)
    pub gap_top: i32,
    /// Blit y of the top pipe sprite
    pub top: i32,
    /// Blit y of the bottom pipe sprite (top edge of the gap's lower bound)
    pub bottom: i32,
    /// Set once when the reference bird passes this pipe
    pub passed: bool,
}

impl Pipe {
    /// Create a pipe at `x` with a gap sampled uniformly from the configured
    /// range. `pipe_height` is the pipe sprite height in pixels.
    pub fn new<R: Rng>(x: f32, config: &PipeConfig, pipe_height: u32, rng: &mut R) -> Self {
        let gap_top = rng.gen_range(config.gap_min..config.gap_max);
        Self {
            x,
            gap_top,
            top: gap_top - pipe_height as i32,
            bottom: gap_top + config.gap,
            passed: false,
        }
    }

    /// Scroll left by the configured velocity
    pub fn advance(&mut self, config: &PipeConfig) {
        self.x -= config.velocity;
    }

    /// True once the pipe has fully scrolled past the left edge
    pub fn off_screen(&self, pipe_width: u32) -> bool {
        self.x + (pipe_width as f32) < 0.0
    }

    /// Pixel-accurate collision between the bird's current animation frame
    /// and either pipe sprite.
    ///
    /// Offsets use the bird's y position rounded half away from zero
    /// (`f32::round`); the bird's mask is the unrotated frame, so the result
    /// is independent of tilt.
    pub fn collide(&self, bird: &Bird, sprites: &SpriteBank) -> bool {
        let bird_mask = &sprites.bird[bird.frame].mask;
        let bird_y = bird.y.round() as i32;
        let dx = (self.x - bird.x).round() as i32;

        let top_offset = (dx, self.top - bird_y);
        let bottom_offset = (dx, self.bottom - bird_y);

        bird_mask.overlap(&sprites.pipe_top.mask, top_offset).is_some()
            || bird_mask
                .overlap(&sprites.pipe_bottom.mask, bottom_offset)
                .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipeConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sprites() -> SpriteBank {
        SpriteBank::builtin()
    }

    #[test]
    fn test_gap_sampled_within_range() {
        let config = PipeConfig::default();
        let sprites = sprites();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..200 {
            let pipe = Pipe::new(600.0, &config, sprites.pipe_height(), &mut rng);
            assert!(pipe.gap_top >= config.gap_min);
            assert!(pipe.gap_top < config.gap_max);
        }
    }

    #[test]
    fn test_gap_geometry_identity() {
        let config = PipeConfig::default();
        let sprites = sprites();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for _ in 0..50 {
            let pipe = Pipe::new(600.0, &config, sprites.pipe_height(), &mut rng);
            // bottom - top = pipe sprite height + gap, for every pipe
            assert_eq!(
                pipe.bottom - pipe.top,
                sprites.pipe_height() as i32 + config.gap
            );
            assert_eq!(pipe.top, pipe.gap_top - sprites.pipe_height() as i32);
        }
    }

    #[test]
    fn test_advance_moves_left() {
        let config = PipeConfig::default();
        let sprites = sprites();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pipe = Pipe::new(600.0, &config, sprites.pipe_height(), &mut rng);

        pipe.advance(&config);
        assert_eq!(pipe.x, 600.0 - config.velocity);
    }

    #[test]
    fn test_off_screen() {
        let config = PipeConfig::default();
        let sprites = sprites();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pipe = Pipe::new(600.0, &config, sprites.pipe_height(), &mut rng);

        assert!(!pipe.off_screen(sprites.pipe_width()));
        pipe.x = -(sprites.pipe_width() as f32) - 1.0;
        assert!(pipe.off_screen(sprites.pipe_width()));
    }

    #[test]
    fn test_collide_when_bird_inside_bottom_pipe() {
        let config = PipeConfig::default();
        let sprites = sprites();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut pipe = Pipe::new(600.0, &config, sprites.pipe_height(), &mut rng);

        let mut bird = Bird::new(230.0, pipe.bottom as f32 + 50.0);
        pipe.x = bird.x; // directly over the bird
        assert!(pipe.collide(&bird, &sprites));

        // Tilt must not change the outcome
        bird.tilt = -90.0;
        assert!(pipe.collide(&bird, &sprites));
        bird.tilt = 25.0;
        assert!(pipe.collide(&bird, &sprites));
    }

    #[test]
    fn test_no_collision_inside_gap() {
        let config = PipeConfig::default();
        let sprites = sprites();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut pipe = Pipe::new(600.0, &config, sprites.pipe_height(), &mut rng);

        // Bird centered vertically in the gap, directly under the pipe pair
        let gap_center = pipe.gap_top as f32 + config.gap as f32 / 2.0;
        let bird = Bird::new(230.0, gap_center - sprites.bird_height() as f32 / 2.0);
        pipe.x = bird.x;
        assert!(!pipe.collide(&bird, &sprites));
    }

    #[test]
    fn test_no_collision_when_horizontally_distant() {
        let config = PipeConfig::default();
        let sprites = sprites();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let pipe = Pipe::new(600.0, &config, sprites.pipe_height(), &mut rng);

        // Bounding boxes don't overlap at all
        let bird = Bird::new(230.0, pipe.bottom as f32);
        assert!(!pipe.collide(&bird, &sprites));
    }
}
