//! FLAPNET GUI entry point
//!
//! Run with: `cargo run --features gui --bin flapnet-gui`
//! Pass `--play` to start in play mode instead of training.

use flapnet::config::Config;
use flapnet::gui::{run_gui, Mode};

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mode = if std::env::args().any(|a| a == "--play") {
        Mode::Play
    } else {
        Mode::Train
    };

    // Load config or use default
    let config = load_config();

    log::info!("Starting FLAPNET GUI");
    log::info!("Window: {}x{}", config.window.width, config.window.height);
    log::info!("Population: {}", config.population.size);

    run_gui(config, mode)
}

/// Load configuration from file or use default
fn load_config() -> Config {
    // Try to load from common locations
    let paths = ["config.yaml", "flapnet.yaml", "../config.yaml"];

    for path in paths {
        if let Ok(config) = Config::from_file(path) {
            log::info!("Loaded config from: {}", path);
            return config;
        }
    }

    log::info!("Using default configuration");
    Config::default()
}
