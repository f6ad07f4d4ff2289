//! Per-frame world state shared by the playable game and the trainer.

use crate::base::Base;
use crate::bird::Bird;
use crate::config::Config;
use crate::pipe::Pipe;
use crate::sprites::SpriteBank;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Scrolling world state: pipes, ground, score and the frame counter.
///
/// The session owns pipe lifecycle (spawn on pass, prune off-screen) and the
/// global score; birds are managed by the caller (one for the playable game,
/// a population for the trainer).
pub struct GameSession {
    pub pipes: Vec<Pipe>,
    pub base: Base,
    /// Monotonic: +1 per pipe-pass event, never decremented
    pub score: u32,
    /// Frames elapsed in this session
    pub frame: u64,
}

impl GameSession {
    /// Create a session with one pipe at the spawn position
    pub fn new<R: rand::Rng>(config: &Config, sprites: &SpriteBank, rng: &mut R) -> Self {
        let pipes = vec![Pipe::new(
            config.pipes.spawn_x,
            &config.pipes,
            sprites.pipe_height(),
            rng,
        )];
        let base = Base::new(config.window.ground_y, sprites.base.width() as f32);

        Self {
            pipes,
            base,
            score: 0,
            frame: 0,
        }
    }

    /// Index of the pipe the birds should steer toward: the second pipe once
    /// the reference bird has cleared the first pipe's trailing edge.
    pub fn target_pipe(&self, reference: &Bird, pipe_width: u32) -> usize {
        if self.pipes.len() > 1 && reference.x > self.pipes[0].x + pipe_width as f32 {
            1
        } else {
            0
        }
    }

    /// True if the bird overlaps any pipe's masks
    pub fn collides(&self, bird: &Bird, sprites: &SpriteBank) -> bool {
        self.pipes.iter().any(|pipe| pipe.collide(bird, sprites))
    }

    /// True if the bird has hit the ground or flown above the ceiling.
    /// Out-of-bounds is a normal state transition, not an error.
    pub fn out_of_bounds(&self, bird: &Bird, config: &Config, sprites: &SpriteBank) -> bool {
        bird.y + sprites.bird_height() as f32 >= config.window.ground_y || bird.y < 0.0
    }

    /// Advance the world one frame: fire the pass event against the
    /// reference bird (exactly once per pipe), scroll pipes and ground,
    /// prune off-screen pipes, and spawn the next pipe on a pass.
    ///
    /// Returns `true` when a pipe-pass event fired this frame; the score has
    /// already been incremented by one, regardless of population size.
    pub fn advance_world<R: rand::Rng>(
        &mut self,
        reference: Option<&Bird>,
        config: &Config,
        sprites: &SpriteBank,
        rng: &mut R,
    ) -> bool {
        let mut passed = false;

        for pipe in &mut self.pipes {
            if let Some(bird) = reference {
                if !pipe.passed && pipe.x < bird.x {
                    pipe.passed = true;
                    passed = true;
                }
            }
            pipe.advance(&config.pipes);
        }

        let pipe_width = sprites.pipe_width();
        self.pipes.retain(|pipe| !pipe.off_screen(pipe_width));

        if passed {
            self.score += 1;
            self.pipes.push(Pipe::new(
                config.pipes.spawn_x,
                &config.pipes,
                sprites.pipe_height(),
                rng,
            ));
        }

        self.base.advance(config.pipes.velocity);
        self.frame += 1;

        passed
    }
}

/// The playable variant: one bird driven by external jump input.
pub struct SinglePlayer {
    pub bird: Bird,
    pub session: GameSession,
    pub alive: bool,
    config: Config,
    rng: ChaCha8Rng,
}

impl SinglePlayer {
    /// Start a game with a freshly seeded RNG
    pub fn new(config: Config, sprites: &SpriteBank) -> Self {
        let seed = rand::random();
        Self::new_with_seed(config, sprites, seed)
    }

    /// Start a game with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, sprites: &SpriteBank, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let session = GameSession::new(&config, sprites, &mut rng);
        let bird = Bird::new(config.bird.start_x, config.bird.start_y);

        Self {
            bird,
            session,
            alive: true,
            config,
            rng,
        }
    }

    /// Jump input (no-op after death)
    pub fn jump(&mut self) {
        if self.alive {
            self.bird.jump(&self.config.bird);
        }
    }

    /// Advance one frame. Returns `false` once the bird has died.
    pub fn step(&mut self, sprites: &SpriteBank) -> bool {
        if !self.alive {
            return false;
        }

        self.bird.advance(&self.config.bird);

        if self.session.collides(&self.bird, sprites)
            || self.session.out_of_bounds(&self.bird, &self.config, sprites)
        {
            self.alive = false;
        }

        let reference = if self.alive { Some(self.bird.clone()) } else { None };
        self.session
            .advance_world(reference.as_ref(), &self.config, sprites, &mut self.rng);

        self.alive
    }

    /// Restart with a fresh session (score resets, bird back to start)
    pub fn reset(&mut self, sprites: &SpriteBank) {
        self.session = GameSession::new(&self.config, sprites, &mut self.rng);
        self.bird = Bird::new(self.config.bird.start_x, self.config.bird.start_y);
        self.alive = true;
    }
}
