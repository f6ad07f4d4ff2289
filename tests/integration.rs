//! Integration tests for FLAPNET

use flapnet::checkpoint::Checkpoint;
use flapnet::game::SinglePlayer;
use flapnet::sprites::SpriteBank;
use flapnet::{Config, Trainer};

#[test]
fn test_full_training_cycle() {
    let mut config = Config::default();
    config.population.size = 20;
    config.safety.max_frames_per_generation = 2_000;

    let mut trainer = Trainer::new_with_seed(config, 12345);

    trainer.run(5);

    // Verify basic invariants
    assert_eq!(trainer.generation, 6);
    assert_eq!(trainer.history.len(), 5);
    assert_eq!(trainer.population(), 20);

    // Every live genome is structurally sound
    for agent in &trainer.agents {
        assert!(agent.brain.is_valid());
        assert_eq!(agent.fitness, 0.0, "fresh generation starts unscored");
    }
}

#[test]
fn test_checkpoint_persistence() {
    let mut config = Config::default();
    config.population.size = 10;
    config.safety.max_frames_per_generation = 1_000;

    let mut trainer = Trainer::new_with_seed(config, 54321);
    trainer.run(3);

    // Create checkpoint
    let checkpoint = trainer.create_checkpoint();
    let temp_path = "/tmp/flapnet_test_integration_checkpoint.bin";
    checkpoint.save(temp_path).expect("Failed to save checkpoint");

    // Load checkpoint
    let loaded = Checkpoint::load(temp_path).expect("Failed to load checkpoint");

    // Verify data integrity
    assert_eq!(loaded.generation, trainer.generation);
    assert_eq!(loaded.genomes.len(), trainer.population());
    assert_eq!(loaded.random_seed, trainer.seed());

    // Restore and continue
    let mut restored = Trainer::from_checkpoint(loaded);
    assert_eq!(restored.generation, trainer.generation);
    assert_eq!(restored.population(), trainer.population());

    restored.run(2);
    assert_eq!(restored.generation, trainer.generation + 2);
    assert_eq!(restored.history.len(), trainer.history.len() + 2);

    // Cleanup
    std::fs::remove_file(temp_path).ok();
}

#[test]
fn test_pipe_layout_reproducibility() {
    let mut config = Config::default();
    config.population.size = 5;
    config.safety.max_frames_per_generation = 1_000;

    // Note: full reproducibility is not possible because neural network
    // weights and mutations use thread_rng(). Pipe gaps come from the
    // seeded RNG, so the first generation's world unfolds identically.
    let mut trainer1 = Trainer::new_with_seed(config.clone(), 99999);
    let mut trainer2 = Trainer::new_with_seed(config, 99999);

    assert_eq!(
        trainer1.session.pipes[0].gap_top,
        trainer2.session.pipes[0].gap_top
    );

    trainer1.run(1);
    trainer2.run(1);
    assert_eq!(trainer1.generation, trainer2.generation);
}

#[test]
fn test_evolution_improves_or_holds() {
    let mut config = Config::default();
    config.population.size = 30;
    config.evolution.mutation_rate = 0.1;
    config.evolution.add_neuron_rate = 0.1;
    config.safety.max_frames_per_generation = 3_000;

    let mut trainer = Trainer::new_with_seed(config, 11111);

    trainer.run(10);

    // Elitism means the best fitness recorded never regresses below the
    // global best of earlier generations by more than chance allows; at
    // minimum the global best must match the history's peak.
    let peak = trainer
        .history
        .snapshots
        .iter()
        .map(|s| s.best_fitness)
        .fold(f32::NEG_INFINITY, f32::max);
    assert_eq!(peak, trainer.best_fitness);
    assert!(trainer.best_brain.is_some());

    println!("Best fitness after 10 generations: {}", trainer.best_fitness);
    println!("Best score: {}", trainer.history.best_score());
}

#[test]
fn test_extinction_recovers() {
    let mut config = Config::default();
    config.population.size = 5;
    config.safety.max_frames_per_generation = 1_000;

    let mut trainer = Trainer::new_with_seed(config, 77777);

    // Silence every controller so the whole population free-falls
    for agent in &mut trainer.agents {
        for layer in &mut agent.brain.layers {
            layer.weights.fill(0.0);
            layer.biases.fill(0.0);
        }
    }

    let stats = trainer.run_generation();
    assert_eq!(stats.survivors, 0);
    assert_eq!(trainer.population(), 0);

    // The next generation respawns a full population
    trainer.evolve();
    assert_eq!(trainer.population(), 5);
    assert_eq!(trainer.session.frame, 0);
}

#[test]
fn test_stats_tracking() {
    let mut config = Config::default();
    config.population.size = 10;
    config.safety.max_frames_per_generation = 1_000;

    let mut trainer = Trainer::new_with_seed(config, 33333);
    trainer.run(4);

    let history = &trainer.history;
    assert_eq!(history.len(), 4);

    // Series data should be available
    let scores = history.score_series();
    let fitness = history.fitness_series();
    assert_eq!(scores.len(), 4);
    assert_eq!(fitness.len(), 4);
    assert_eq!(scores[0].0, 1);
    assert_eq!(scores[3].0, 4);

    // Every generation ran at least one frame
    assert!(history.snapshots.iter().all(|s| s.frames > 0));
}

#[test]
fn test_neural_network_consistency() {
    let mut config = Config::default();
    config.population.size = 15;
    config.safety.max_frames_per_generation = 1_000;

    let mut trainer = Trainer::new_with_seed(config, 44444);
    trainer.run(3);

    // All live genomes accept the game's feature vector
    for agent in &trainer.agents {
        assert!(agent.brain.is_valid());
        assert_eq!(agent.brain.n_inputs, 3);
        assert_eq!(agent.brain.n_outputs, 1);

        let inputs = [350.0f32, 120.0, 80.0];
        let outputs = agent.brain.forward(&inputs);
        assert_eq!(outputs.len(), 1);
        assert!(outputs[0] >= -1.0 && outputs[0] <= 1.0);
    }
}

#[test]
fn test_single_player_session() {
    let config = Config::default();
    let sprites = SpriteBank::builtin();
    let mut player = SinglePlayer::new_with_seed(config, &sprites, 55555);

    // Without input the bird free-falls into the ground
    let mut frames = 0u32;
    while player.step(&sprites) {
        frames += 1;
        assert!(frames < 500, "an idle bird must die");
    }
    assert!(!player.alive);
    assert_eq!(player.session.score, 0);

    // Jumps after death are ignored
    let y = player.bird.y;
    player.jump();
    player.step(&sprites);
    assert_eq!(player.bird.y, y);

    // Reset restores a playable session
    player.reset(&sprites);
    assert!(player.alive);
    assert_eq!(player.session.score, 0);
    assert_eq!(player.session.frame, 0);
}
