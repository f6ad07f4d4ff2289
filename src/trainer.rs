//! Evolution driver: evaluates a whole population per game episode.
//!
//! One generation is one simulation episode. Every genome gets a fresh bird
//! at the start position; each frame, every live bird's position and
//! pipe-distance features are fed to its brain, which may trigger a jump.
//! Fitness accrues per surviving frame and per pipe passed, with a penalty
//! on pipe collision. The generation ends when the live population is empty
//! (or the safety frame cap fires), and the evolution strategy produces the
//! next population.

use crate::bird::Bird;
use crate::checkpoint::Checkpoint;
use crate::config::Config;
use crate::evolution::{EvolutionStrategy, ScoredGenome, TournamentEvolution};
use crate::game::GameSession;
use crate::neural::Brain;
use crate::sprites::SpriteBank;
use crate::stats::{GenerationStats, StatsHistory};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// One live population entry: bird, controller and fitness accumulator share
/// a lifecycle and are evicted together, so the 1:1:1 correspondence between
/// them holds structurally.
pub struct Agent {
    pub bird: Bird,
    pub brain: Brain,
    pub fitness: f32,
    dead: bool,
}

impl Agent {
    fn new(bird: Bird, brain: Brain) -> Self {
        Self {
            bird,
            brain,
            fitness: 0.0,
            dead: false,
        }
    }
}

/// The training harness
pub struct Trainer {
    /// Live population
    pub agents: Vec<Agent>,
    /// Scrolling world for the current generation
    pub session: GameSession,
    /// Sprite bank (masks drive collision)
    pub sprites: SpriteBank,
    /// Current generation (1-based)
    pub generation: u32,
    /// Configuration
    pub config: Config,
    /// Per-generation history
    pub history: StatsHistory,
    /// Best fitness seen across all generations
    pub best_fitness: f32,
    /// Brain that achieved the best fitness
    pub best_brain: Option<Brain>,

    /// Genomes scored out of the live population this generation
    graveyard: Vec<ScoredGenome>,
    /// Scored population of the last finished generation
    last_scored: Vec<ScoredGenome>,
    /// Evolution strategy (pluggable)
    strategy: Box<dyn EvolutionStrategy>,
    /// Seeded RNG for gap sampling
    rng: ChaCha8Rng,
    seed: u64,
}

impl Trainer {
    /// Create a trainer with a freshly seeded RNG and the default strategy
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a trainer with a specific seed for reproducible pipe layouts
    pub fn new_with_seed(config: Config, seed: u64) -> Self {
        let strategy = Box::new(TournamentEvolution::from_config(&config));
        Self::with_strategy(config, seed, strategy)
    }

    /// Create a trainer with a custom evolution strategy
    pub fn with_strategy(
        config: Config,
        seed: u64,
        mut strategy: Box<dyn EvolutionStrategy>,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let sprites = SpriteBank::builtin();
        let session = GameSession::new(&config, &sprites, &mut rng);
        let genomes = strategy.next_generation(&[]);

        let mut trainer = Self {
            agents: Vec::new(),
            session,
            sprites,
            generation: 1,
            config,
            history: StatsHistory::new(),
            best_fitness: f32::NEG_INFINITY,
            best_brain: None,
            graveyard: Vec::new(),
            last_scored: Vec::new(),
            strategy,
            rng,
            seed,
        };
        trainer.spawn(genomes);
        trainer
    }

    /// Restore a trainer from a checkpoint; the restored generation starts
    /// fresh with the checkpointed genomes.
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(checkpoint.random_seed);
        let sprites = SpriteBank::builtin();
        let session = GameSession::new(&checkpoint.config, &sprites, &mut rng);
        let strategy = Box::new(TournamentEvolution::from_config(&checkpoint.config));

        let mut trainer = Self {
            agents: Vec::new(),
            session,
            sprites,
            generation: checkpoint.generation,
            config: checkpoint.config,
            history: checkpoint.history,
            best_fitness: checkpoint.best_fitness,
            best_brain: checkpoint.best_brain,
            graveyard: Vec::new(),
            last_scored: Vec::new(),
            strategy,
            rng,
            seed: checkpoint.random_seed,
        };
        trainer.spawn(checkpoint.genomes);
        trainer
    }

    /// Snapshot the current training state.
    ///
    /// Between `finish_generation` and `evolve` the live population is
    /// usually empty (generations normally end by extinction), so the
    /// genomes fall back to the last scored population.
    pub fn create_checkpoint(&self) -> Checkpoint {
        let genomes = if self.agents.is_empty() {
            self.last_scored.iter().map(|s| s.brain.clone()).collect()
        } else {
            self.agents.iter().map(|a| a.brain.clone()).collect()
        };
        Checkpoint::new(
            self.generation,
            self.config.clone(),
            genomes,
            self.best_brain.clone(),
            self.best_fitness,
            self.history.clone(),
            self.seed,
        )
    }

    /// Spawn a generation: every genome gets a fresh bird at the start
    /// position, and the world resets.
    fn spawn(&mut self, genomes: Vec<Brain>) {
        self.agents = genomes
            .into_iter()
            .map(|brain| {
                Agent::new(
                    Bird::new(self.config.bird.start_x, self.config.bird.start_y),
                    brain,
                )
            })
            .collect();
        self.session = GameSession::new(&self.config, &self.sprites, &mut self.rng);
        self.graveyard.clear();
    }

    /// Number of live agents
    pub fn population(&self) -> usize {
        self.agents.len()
    }

    /// True when the current generation's episode is over
    pub fn generation_done(&self) -> bool {
        self.agents.is_empty()
            || self.session.frame >= self.config.safety.max_frames_per_generation
    }

    /// Advance the episode by one frame.
    ///
    /// Order per frame: physics + frame reward + controller decision for
    /// every live bird, then collision scoring, then world scroll with the
    /// global pass event (reference = first live bird), then eviction of
    /// dead entries in a single pass.
    pub fn step_frame(&mut self) {
        if self.agents.is_empty() {
            return;
        }

        let pipe_width = self.sprites.pipe_width();
        let target = self
            .session
            .target_pipe(&self.agents[0].bird, pipe_width);
        let (gap_top, gap_bottom) = {
            let pipe = &self.session.pipes[target];
            (pipe.gap_top as f32, pipe.bottom as f32)
        };

        for agent in &mut self.agents {
            agent.bird.advance(&self.config.bird);
            agent.fitness += self.config.fitness.frame_reward;

            let inputs = [
                agent.bird.y,
                (agent.bird.y - gap_top).abs(),
                (agent.bird.y - gap_bottom).abs(),
            ];
            let output = agent.brain.forward(&inputs);
            if output[0] > self.config.population.jump_threshold {
                agent.bird.jump(&self.config.bird);
            }
        }

        // Collision scoring: pipe hits are penalized, leaving the screen
        // vertically is not.
        for agent in &mut self.agents {
            if self.session.collides(&agent.bird, &self.sprites) {
                agent.fitness -= self.config.fitness.collision_penalty;
                agent.dead = true;
            } else if self
                .session
                .out_of_bounds(&agent.bird, &self.config, &self.sprites)
            {
                agent.dead = true;
            }
        }

        // World scroll and the global pass event, referenced to the first
        // still-live bird
        let reference = self
            .agents
            .iter()
            .find(|a| !a.dead)
            .map(|a| a.bird.clone());
        let passed = self.session.advance_world(
            reference.as_ref(),
            &self.config,
            &self.sprites,
            &mut self.rng,
        );
        if passed {
            for agent in self.agents.iter_mut().filter(|a| !a.dead) {
                agent.fitness += self.config.fitness.pipe_reward;
            }
        }

        // Evict dead entries: bird, brain and fitness leave together
        for agent in self.agents.iter().filter(|a| a.dead) {
            self.graveyard.push(ScoredGenome {
                brain: agent.brain.clone(),
                fitness: agent.fitness,
            });
        }
        self.agents.retain(|a| !a.dead);
    }

    /// Close out the current generation: score any survivors, record stats,
    /// and update the best genome.
    fn finish_generation(&mut self) -> GenerationStats {
        let survivors = self.agents.len();

        let mut scored = std::mem::take(&mut self.graveyard);
        scored.extend(self.agents.iter().map(|a| ScoredGenome {
            brain: a.brain.clone(),
            fitness: a.fitness,
        }));

        let stats = GenerationStats::from_scored(
            self.generation,
            self.session.frame,
            self.session.score,
            survivors,
            &scored,
        );

        for genome in &scored {
            if genome.fitness > self.best_fitness {
                self.best_fitness = genome.fitness;
                self.best_brain = Some(genome.brain.clone());
            }
        }

        if self.generation % self.config.logging.stats_interval.max(1) == 0 {
            log::info!("{}", stats.summary());
        }

        self.history.record(stats.clone());
        self.last_scored = scored;
        stats
    }

    /// Run the current generation's episode to completion
    pub fn run_generation(&mut self) -> GenerationStats {
        while !self.generation_done() {
            self.step_frame();
        }
        self.finish_generation()
    }

    /// Produce and spawn the next generation from the last scored population
    pub fn evolve(&mut self) {
        let genomes = self.strategy.next_generation(&self.last_scored);
        self.generation += 1;
        self.spawn(genomes);
    }

    /// Advance one frame, rolling over to the next generation when the
    /// episode ends. Used by the rendered front-end.
    pub fn tick(&mut self) {
        if self.generation_done() {
            self.finish_generation();
            self.evolve();
        } else {
            self.step_frame();
        }
    }

    /// Run a number of full generations
    pub fn run(&mut self, generations: u32) {
        for _ in 0..generations {
            self.run_generation();
            self.evolve();
        }
    }

    /// Run generations with a callback after each one
    pub fn run_with_callback<F>(&mut self, generations: u32, mut callback: F)
    where
        F: FnMut(&Trainer, &GenerationStats),
    {
        for _ in 0..generations {
            let stats = self.run_generation();
            callback(self, &stats);
            self.evolve();
        }
    }

    /// Seed used for pipe-gap sampling
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
