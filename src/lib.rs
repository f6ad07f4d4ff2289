//! # FLAPNET
//!
//! Flappy Bird clone with a neuroevolution training harness.
//!
//! ## Features
//!
//! - **Faithful**: pixel-mask collision, tilt animation, scrolling ground
//! - **Evolvable**: tiny feed-forward controllers bred by tournament selection
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: seeded pipe-gap generation
//! - **Playable**: optional egui front-end (`gui` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flapnet::{Config, Trainer};
//!
//! // Train a population with default settings
//! let config = Config::default();
//! let mut trainer = Trainer::new(config);
//!
//! trainer.run(50);
//!
//! println!("Best score: {}", trainer.history.best_score());
//! println!("Best fitness: {}", trainer.best_fitness);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use flapnet::Config;
//!
//! let mut config = Config::default();
//! config.population.size = 100;
//! config.evolution.mutation_rate = 0.1;
//! ```
//!
//! ## Checkpoints
//!
//! ```rust,no_run
//! use flapnet::{Config, Trainer};
//! use flapnet::checkpoint::Checkpoint;
//!
//! let mut trainer = Trainer::new(Config::default());
//! trainer.run(50);
//!
//! // Save checkpoint
//! let checkpoint = trainer.create_checkpoint();
//! checkpoint.save("checkpoint.bin").unwrap();
//!
//! // Load checkpoint
//! let loaded = Checkpoint::load("checkpoint.bin").unwrap();
//! let restored = flapnet::Trainer::from_checkpoint(loaded);
//! ```

pub mod base;
pub mod bird;
pub mod checkpoint;
pub mod config;
pub mod evolution;
pub mod game;
pub mod neural;
pub mod pipe;
pub mod sprites;
pub mod stats;
pub mod trainer;

#[cfg(feature = "gui")]
pub mod gui;

// Re-export main types
pub use config::Config;
pub use game::SinglePlayer;
pub use neural::Brain;
pub use trainer::Trainer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(generations: u32, population: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.population.size = population;

    let mut trainer = Trainer::new(config);

    let start = Instant::now();
    trainer.run(generations);
    let elapsed = start.elapsed();

    let frames: u64 = trainer.history.snapshots.iter().map(|s| s.frames).sum();

    BenchmarkResult {
        generations,
        population,
        frames,
        best_score: trainer.history.best_score(),
        elapsed_secs: elapsed.as_secs_f64(),
        frames_per_second: frames as f64 / elapsed.as_secs_f64(),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub generations: u32,
    pub population: usize,
    pub frames: u64,
    pub best_score: u32,
    pub elapsed_secs: f64,
    pub frames_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Generations: {}", self.generations)?;
        writeln!(f, "Population: {}", self.population)?;
        writeln!(f, "Frames: {}", self.frames)?;
        writeln!(f, "Best score: {}", self.best_score)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} frames/s", self.frames_per_second)?;
        Ok(())
    }
}
