//! FLAPNET - CLI entry point
//!
//! Flappy Bird neuroevolution trainer.

use clap::{Parser, Subcommand};
use flapnet::checkpoint::{Checkpoint, CheckpointManager};
use flapnet::{benchmark, Config, Trainer};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "flapnet")]
#[command(version)]
#[command(about = "Flappy Bird clone with a neuroevolution training harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new population
    Train {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of generations to train
        #[arg(short, long, default_value = "100")]
        generations: u32,

        /// Output directory for checkpoints
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducible pipe layouts
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Resume training from checkpoint
    Resume {
        /// Checkpoint file to resume from
        #[arg(short, long)]
        checkpoint: PathBuf,

        /// Number of additional generations
        #[arg(short, long, default_value = "100")]
        generations: u32,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of generations
        #[arg(short, long, default_value = "20")]
        generations: u32,

        /// Population size
        #[arg(short, long, default_value = "50")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },

    /// Analyze a checkpoint file
    Analyze {
        /// Checkpoint file
        checkpoint: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            config,
            generations,
            output,
            seed,
            quiet,
        } => train(config, generations, output, seed, quiet),

        Commands::Resume {
            checkpoint,
            generations,
            output,
        } => resume(checkpoint, generations, output),

        Commands::Benchmark {
            generations,
            population,
        } => run_benchmark(generations, population),

        Commands::Init { output } => generate_config(output),

        Commands::Analyze { checkpoint } => analyze_checkpoint(checkpoint),
    }
}

fn train(
    config_path: PathBuf,
    generations: u32,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let config = if config_path.exists() {
        println!("Loading config from: {:?}", config_path);
        Config::from_file(&config_path)?
    } else {
        println!("Using default configuration");
        Config::default()
    };

    std::fs::create_dir_all(&output)?;

    let mut trainer = if let Some(s) = seed {
        println!("Using seed: {}", s);
        Trainer::new_with_seed(config.clone(), s)
    } else {
        Trainer::new(config.clone())
    };

    println!("Starting training");
    println!("  Population: {}", trainer.population());
    println!(
        "  Window: {}x{}",
        config.window.width, config.window.height
    );
    println!("  Generations: {}", generations);
    println!();

    let mut checkpoint_mgr = CheckpointManager::new(
        output.to_string_lossy().to_string(),
        config.logging.checkpoint_interval,
        10, // Keep last 10 checkpoints
    );

    let start = Instant::now();

    trainer.run_with_callback(generations, |trainer, stats| {
        if !quiet {
            println!("{}", stats.summary());
        }

        if checkpoint_mgr.should_save(trainer.generation) {
            let checkpoint = trainer.create_checkpoint();
            match checkpoint_mgr.save(&checkpoint) {
                Ok(path) => {
                    if !quiet {
                        println!("  Checkpoint saved: {}", path);
                    }
                }
                Err(e) => eprintln!("  Checkpoint error: {}", e),
            }
        }
    });

    let elapsed = start.elapsed();
    let frames: u64 = trainer.history.snapshots.iter().map(|s| s.frames).sum();

    println!();
    println!("=== Training Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Generations: {}", trainer.history.len());
    println!("Frames: {}", frames);
    println!("Speed: {:.1} frames/s", frames as f64 / elapsed.as_secs_f64());
    println!("Best score: {}", trainer.history.best_score());
    println!("Best fitness: {:.1}", trainer.best_fitness);

    // Final checkpoint
    let final_checkpoint = trainer.create_checkpoint();
    let final_path = output.join("checkpoint_final.bin");
    final_checkpoint.save(&final_path)?;
    println!("Final checkpoint: {:?}", final_path);

    // Save stats history
    let stats_path = output.join("stats_history.json");
    if let Some(path_str) = stats_path.to_str() {
        trainer.history.save(path_str)?;
        println!("Stats history: {:?}", stats_path);
    }

    Ok(())
}

fn resume(
    checkpoint_path: PathBuf,
    generations: u32,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading checkpoint: {:?}", checkpoint_path);

    let checkpoint = Checkpoint::load(&checkpoint_path)?;
    let mut trainer = Trainer::from_checkpoint(checkpoint);

    println!("Resumed at generation {}", trainer.generation);
    println!("Population: {}", trainer.population());
    println!("Training {} additional generations", generations);
    println!();

    std::fs::create_dir_all(&output)?;

    let mut checkpoint_mgr = CheckpointManager::new(
        output.to_string_lossy().to_string(),
        trainer.config.logging.checkpoint_interval,
        10,
    );

    let start = Instant::now();

    trainer.run_with_callback(generations, |trainer, stats| {
        println!("{}", stats.summary());

        if checkpoint_mgr.should_save(trainer.generation) {
            let checkpoint = trainer.create_checkpoint();
            if let Ok(path) = checkpoint_mgr.save(&checkpoint) {
                println!("  Checkpoint: {}", path);
            }
        }
    });

    let elapsed = start.elapsed();
    println!();
    println!("=== Resume Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Generation: {}", trainer.generation);
    println!("Best score: {}", trainer.history.best_score());

    let final_checkpoint = trainer.create_checkpoint();
    let final_path = output.join("checkpoint_final.bin");
    final_checkpoint.save(&final_path)?;
    println!("Final checkpoint: {:?}", final_path);

    Ok(())
}

fn run_benchmark(generations: u32, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== FLAPNET Benchmark ===");
    println!("Generations: {}", generations);
    println!("Population: {}", population);
    println!();

    let result = benchmark(generations, population);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn analyze_checkpoint(checkpoint_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Checkpoint Analysis ===");
    println!("File: {:?}", checkpoint_path);
    println!();

    let checkpoint = Checkpoint::load(&checkpoint_path)?;

    println!("Generation: {}", checkpoint.generation);
    println!("Population: {}", checkpoint.genomes.len());
    println!("Best fitness: {:.1}", checkpoint.best_fitness);
    println!("Seed: {}", checkpoint.random_seed);
    println!();

    if !checkpoint.genomes.is_empty() {
        let avg_brain: f32 = checkpoint
            .genomes
            .iter()
            .map(|b| b.complexity() as f32)
            .sum::<f32>()
            / checkpoint.genomes.len() as f32;
        let max_brain = checkpoint
            .genomes
            .iter()
            .map(|b| b.complexity())
            .max()
            .unwrap_or(0);
        let avg_params: f32 = checkpoint
            .genomes
            .iter()
            .map(|b| b.parameter_count() as f32)
            .sum::<f32>()
            / checkpoint.genomes.len() as f32;

        println!("Average brain complexity: {:.2}", avg_brain);
        println!("Max brain complexity: {}", max_brain);
        println!("Average parameters: {:.1}", avg_params);
    }

    if let Some(best) = &checkpoint.best_brain {
        println!();
        println!("Best brain: {} hidden neurons, {} parameters",
            best.complexity(),
            best.parameter_count()
        );
    }

    if !checkpoint.history.is_empty() {
        println!();
        println!("Recorded generations: {}", checkpoint.history.len());
        println!("Best score: {}", checkpoint.history.best_score());
        if let Some(last) = checkpoint.history.snapshots.last() {
            println!("Last generation: {}", last.summary());
        }
    }

    println!();
    println!(
        "Checkpoint size: {:.2} MB",
        checkpoint.size_bytes() as f64 / 1_000_000.0
    );

    Ok(())
}
