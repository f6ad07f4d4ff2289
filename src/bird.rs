//! Bird state and per-frame physics.

use crate::config::BirdConfig;

/// Number of animation frames in the wing-flap cycle
pub const ANIMATION_FRAMES: usize = 3;

/// Tilt below which the nose-dive pose is shown
const NOSE_DIVE_TILT: f32 = -80.0;

/// Tilt floor while falling
const MIN_TILT: f32 = -90.0;

/// Extra height above the jump reference within which the bird keeps tilting up
const TILT_UP_MARGIN: f32 = 50.0;

/// A bird: position, vertical velocity, tilt and animation state.
///
/// Vertical motion follows a quadratic displacement-over-time model that is
/// re-seeded on every jump: the tick counter resets to zero and velocity is
/// set to the configured launch constant.
#[derive(Clone, Debug)]
pub struct Bird {
    /// Horizontal position (fixed; the world scrolls instead)
    pub x: f32,
    /// Vertical position of the sprite's top edge
    pub y: f32,
    /// Tilt angle in degrees, bounded [-90, +max_tilt]
    pub tilt: f32,
    /// Vertical velocity seeded by the last jump
    pub vel: f32,
    /// Ticks since the last jump
    pub tick_count: u32,
    /// Y position at the time of the last jump (tilt reference)
    pub height: f32,
    /// Animation counter, advanced once per frame
    pub img_count: u32,
    /// Current animation frame index
    pub frame: usize,
}

impl Bird {
    /// Create a bird at the given position
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            tilt: 0.0,
            vel: 0.0,
            tick_count: 0,
            height: y,
            img_count: 0,
            frame: 0,
        }
    }

    /// Launch upward: reset the tick counter and re-seed velocity,
    /// regardless of prior state.
    pub fn jump(&mut self, config: &BirdConfig) {
        self.vel = config.jump_velocity;
        self.tick_count = 0;
        self.height = self.y;
    }

    /// Advance one physics tick: apply displacement, update tilt, and step
    /// the animation counter.
    pub fn advance(&mut self, config: &BirdConfig) {
        self.tick_count += 1;
        let d = self.displacement(config);
        self.y += d;

        // Tilt up while ascending or while still above the jump reference;
        // otherwise decay toward the nose-dive floor.
        if d < 0.0 || self.y < self.height + TILT_UP_MARGIN {
            if self.tilt < config.max_tilt {
                self.tilt = config.max_tilt;
            }
        } else if self.tilt > MIN_TILT {
            self.tilt = (self.tilt - config.tilt_step).max(MIN_TILT);
        }

        self.animate(config);
    }

    /// Displacement the bird would travel on the current tick: quadratic in
    /// time since the last jump, clamped at the terminal value downward and
    /// boosted by a small constant while moving upward.
    pub fn displacement(&self, config: &BirdConfig) -> f32 {
        let t = self.tick_count as f32;
        let mut d = self.vel * t + config.gravity * t * t;
        if d >= config.terminal_displacement {
            d = config.terminal_displacement;
        }
        if d < 0.0 {
            d -= config.lift_boost;
        }
        d
    }

    /// Step the wing-flap animation, independent of physics. While tilted
    /// steeply downward the wings lock to the mid frame and the counter is
    /// pinned so the flap cycle resumes cleanly on recovery.
    fn animate(&mut self, config: &BirdConfig) {
        self.img_count += 1;
        if self.tilt <= NOSE_DIVE_TILT {
            self.frame = 1;
            self.img_count = config.animation_time * 2;
        } else {
            self.frame = (self.img_count / config.animation_time) as usize % ANIMATION_FRAMES;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BirdConfig;

    fn config() -> BirdConfig {
        BirdConfig::default()
    }

    #[test]
    fn test_jump_reseeds_motion() {
        let config = config();
        let mut bird = Bird::new(230.0, 350.0);

        for _ in 0..17 {
            bird.advance(&config);
        }
        assert!(bird.tick_count > 0);

        bird.jump(&config);
        assert_eq!(bird.tick_count, 0);
        assert_eq!(bird.vel, config.jump_velocity);
        assert_eq!(bird.height, bird.y);

        // And again from an arbitrary mid-flight state
        bird.advance(&config);
        bird.advance(&config);
        bird.jump(&config);
        assert_eq!(bird.tick_count, 0);
        assert_eq!(bird.vel, config.jump_velocity);
    }

    #[test]
    fn test_displacement_never_exceeds_terminal() {
        let config = config();
        let mut bird = Bird::new(230.0, 350.0);

        for tick in 0..200 {
            let before = bird.y;
            bird.advance(&config);
            let d = bird.y - before;
            assert!(
                d <= config.terminal_displacement,
                "displacement {} exceeded terminal at tick {}",
                d,
                tick
            );
        }
    }

    #[test]
    fn test_free_fall_reaches_terminal_and_stays() {
        let config = config();
        let mut bird = Bird::new(230.0, 0.0);

        let mut displacements = Vec::new();
        for _ in 0..50 {
            let before = bird.y;
            bird.advance(&config);
            displacements.push(bird.y - before);
        }

        // Without jump input the fall saturates at the terminal displacement
        // and holds there for the remainder of the window.
        let saturated = displacements
            .iter()
            .position(|&d| d == config.terminal_displacement)
            .expect("terminal displacement never reached");
        assert!(displacements[saturated..]
            .iter()
            .all(|&d| d == config.terminal_displacement));
    }

    #[test]
    fn test_upward_motion_gets_lift_boost() {
        let config = config();
        let mut bird = Bird::new(230.0, 350.0);
        bird.jump(&config);

        let before = bird.y;
        bird.advance(&config);
        let d = bird.y - before;

        // First tick after a jump: v*1 + 1.5*1 = -9, boosted to -11
        assert_eq!(d, config.jump_velocity + config.gravity - config.lift_boost);
        assert!(d < 0.0);
    }

    #[test]
    fn test_tilt_snaps_up_while_ascending() {
        let config = config();
        let mut bird = Bird::new(230.0, 350.0);
        bird.jump(&config);
        bird.advance(&config);
        assert_eq!(bird.tilt, config.max_tilt);
    }

    #[test]
    fn test_tilt_decays_to_floor_while_falling() {
        let config = config();
        let mut bird = Bird::new(230.0, 0.0);

        for _ in 0..60 {
            bird.advance(&config);
        }
        assert_eq!(bird.tilt, MIN_TILT);
    }

    #[test]
    fn test_nose_dive_locks_animation_frame() {
        let config = config();
        let mut bird = Bird::new(230.0, 0.0);

        for _ in 0..60 {
            bird.advance(&config);
        }
        assert!(bird.tilt <= NOSE_DIVE_TILT);
        assert_eq!(bird.frame, 1);

        // Frame stays locked while diving
        bird.advance(&config);
        assert_eq!(bird.frame, 1);
    }

    #[test]
    fn test_animation_cycles_through_frames() {
        let config = config();
        let mut bird = Bird::new(230.0, 350.0);

        let mut seen = [false; ANIMATION_FRAMES];
        for _ in 0..(config.animation_time * ANIMATION_FRAMES as u32) {
            // Keep the bird out of the nose-dive pose
            bird.jump(&config);
            bird.advance(&config);
            seen[bird.frame] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
