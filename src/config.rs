//! Configuration system for the FLAPNET trainer.
//!
//! Supports YAML configuration files with sensible defaults. The defaults
//! reproduce the classic arcade tuning (500x800 window, 30 fps, pipe gap 200).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub window: WindowConfig,
    pub bird: BirdConfig,
    pub pipes: PipeConfig,
    pub fitness: FitnessConfig,
    pub population: PopulationConfig,
    pub evolution: EvolutionConfig,
    pub safety: SafetyConfig,
    pub logging: LoggingConfig,
}

/// Window and frame pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Logical window width in pixels
    pub width: u32,
    /// Logical window height in pixels
    pub height: u32,
    /// Simulation tick rate (frames per second)
    pub fps: u32,
    /// Y coordinate of the ground line (top of the base strip)
    pub ground_y: f32,
}

/// Bird physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirdConfig {
    /// Horizontal start position
    pub start_x: f32,
    /// Vertical start position
    pub start_y: f32,
    /// Vertical velocity applied by a jump (negative = upward)
    pub jump_velocity: f32,
    /// Quadratic coefficient of the displacement-over-time model
    pub gravity: f32,
    /// Maximum downward displacement per tick
    pub terminal_displacement: f32,
    /// Extra displacement granted while moving upward
    pub lift_boost: f32,
    /// Maximum upward tilt in degrees
    pub max_tilt: f32,
    /// Tilt decay per frame while descending, in degrees
    pub tilt_step: f32,
    /// Frames each animation frame is held
    pub animation_time: u32,
}

/// Pipe spawning and movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeConfig {
    /// Vertical gap between top and bottom pipe
    pub gap: i32,
    /// Horizontal scroll velocity (pipes and ground)
    pub velocity: f32,
    /// Lower bound for the sampled gap top (inclusive)
    pub gap_min: i32,
    /// Upper bound for the sampled gap top (exclusive)
    pub gap_max: i32,
    /// X position new pipes spawn at
    pub spawn_x: f32,
}

/// Fitness shaping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessConfig {
    /// Reward per surviving frame
    pub frame_reward: f32,
    /// Reward per pipe passed
    pub pipe_reward: f32,
    /// Penalty subtracted when colliding with a pipe
    pub collision_penalty: f32,
}

/// Population configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of genomes per generation
    pub size: usize,
    /// Controller output above which a jump is triggered
    pub jump_threshold: f32,
}

/// Evolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Probability of weight mutation per weight
    pub mutation_rate: f32,
    /// Magnitude of weight mutations
    pub mutation_strength: f32,
    /// Probability of adding a hidden layer
    pub add_neuron_rate: f32,
    /// Probability of strengthening a connection
    pub add_connection_rate: f32,
    /// Fraction of offspring produced by two-parent crossover
    pub crossover_rate: f32,
    /// Fraction of the population copied unchanged into the next generation
    pub elitism_rate: f32,
    /// Tournament size for parent selection
    pub tournament_size: usize,
}

/// Safety limits to prevent runaway training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Maximum frames a single generation may run
    pub max_frames_per_generation: u64,
    /// Maximum hidden neurons per brain
    pub max_neurons: usize,
}

/// Logging and checkpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Generations between checkpoints
    pub checkpoint_interval: u32,
    /// Generations between stats logging
    pub stats_interval: u32,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            bird: BirdConfig::default(),
            pipes: PipeConfig::default(),
            fitness: FitnessConfig::default(),
            population: PopulationConfig::default(),
            evolution: EvolutionConfig::default(),
            safety: SafetyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 800,
            fps: 30,
            ground_y: 730.0,
        }
    }
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            start_x: 230.0,
            start_y: 350.0,
            jump_velocity: -10.5,
            gravity: 1.5,
            terminal_displacement: 16.0,
            lift_boost: 2.0,
            max_tilt: 25.0,
            tilt_step: 20.0,
            animation_time: 5,
        }
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            gap: 200,
            velocity: 5.0,
            gap_min: 50,
            gap_max: 450,
            spawn_x: 600.0,
        }
    }
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            frame_reward: 0.1,
            pipe_reward: 5.0,
            collision_penalty: 1.0,
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 50,
            jump_threshold: 0.5,
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.05,
            mutation_strength: 0.3,
            add_neuron_rate: 0.03,
            add_connection_rate: 0.05,
            crossover_rate: 0.1,
            elitism_rate: 0.1,
            tournament_size: 3,
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            max_frames_per_generation: 20_000,
            max_neurons: 50,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 25,
            stats_interval: 1,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err("window dimensions must be > 0".to_string());
        }
        if self.window.fps == 0 {
            return Err("fps must be > 0".to_string());
        }
        if self.window.ground_y <= 0.0 || self.window.ground_y > self.window.height as f32 {
            return Err("ground_y must lie inside the window".to_string());
        }
        if self.pipes.gap_min >= self.pipes.gap_max {
            return Err("gap_min must be less than gap_max".to_string());
        }
        if (self.pipes.gap_max + self.pipes.gap) as f32 > self.window.ground_y {
            return Err("gap range plus gap height must fit above the ground".to_string());
        }
        if self.pipes.velocity <= 0.0 {
            return Err("pipe velocity must be > 0".to_string());
        }
        if self.population.size == 0 {
            return Err("population size must be > 0".to_string());
        }
        if self.population.jump_threshold <= 0.0 || self.population.jump_threshold >= 1.0 {
            return Err("jump_threshold must be in (0, 1)".to_string());
        }
        if self.evolution.tournament_size == 0 {
            return Err("tournament_size must be > 0".to_string());
        }
        if self.safety.max_frames_per_generation == 0 {
            return Err("max_frames_per_generation must be > 0".to_string());
        }
        Ok(())
    }
}
