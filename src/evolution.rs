//! Population evolution between generations.
//!
//! The trainer hands a fully scored population to an [`EvolutionStrategy`]
//! and receives the next generation's genomes back. The strategy is a
//! pluggable seam: the bundled [`TournamentEvolution`] uses elitism plus
//! tournament selection, but anything that maps scored genomes to a new
//! population fits.

use crate::config::Config;
use crate::neural::{Brain, CrossoverStrategy, MutationConfig, N_INPUTS, N_OUTPUTS};
use rand::seq::SliceRandom;
use rand::Rng;

/// A genome with the fitness it earned during an evaluation episode
#[derive(Clone, Debug)]
pub struct ScoredGenome {
    pub brain: Brain,
    pub fitness: f32,
}

/// Given a scored population, produce the next population.
pub trait EvolutionStrategy {
    /// Produce the genomes for the next generation. Implementations must
    /// return exactly the configured population size, even when `scored` is
    /// empty (fresh random genomes in that case).
    fn next_generation(&mut self, scored: &[ScoredGenome]) -> Vec<Brain>;
}

/// Default strategy: elitism + tournament selection + crossover + mutation.
pub struct TournamentEvolution {
    pub mutation_config: MutationConfig,
    pub crossover_strategy: CrossoverStrategy,
    pub crossover_rate: f32,
    pub elitism_rate: f32,
    pub tournament_size: usize,
    pub population_size: usize,
}

impl TournamentEvolution {
    /// Build the strategy from config
    pub fn from_config(config: &Config) -> Self {
        Self {
            mutation_config: MutationConfig {
                weight_mutation_rate: config.evolution.mutation_rate,
                weight_mutation_strength: config.evolution.mutation_strength,
                add_neuron_rate: config.evolution.add_neuron_rate,
                add_connection_rate: config.evolution.add_connection_rate,
                max_neurons: config.safety.max_neurons,
            },
            crossover_strategy: CrossoverStrategy::default(),
            crossover_rate: config.evolution.crossover_rate,
            elitism_rate: config.evolution.elitism_rate,
            tournament_size: config.evolution.tournament_size,
            population_size: config.population.size,
        }
    }

    /// Spawn a population of fresh minimal genomes
    pub fn fresh_population(&self) -> Vec<Brain> {
        (0..self.population_size)
            .map(|_| Brain::new_minimal(N_INPUTS, N_OUTPUTS))
            .collect()
    }

    /// Pick a parent by tournament: sample `tournament_size` candidates and
    /// keep the fittest. Callers guarantee `scored` is non-empty.
    fn select_parent<'a, R: Rng>(
        &self,
        scored: &'a [ScoredGenome],
        rng: &mut R,
    ) -> &'a ScoredGenome {
        scored
            .choose_multiple(rng, self.tournament_size.min(scored.len()))
            .max_by(|a, b| {
                a.fitness
                    .partial_cmp(&b.fitness)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(&scored[0])
    }
}

impl EvolutionStrategy for TournamentEvolution {
    fn next_generation(&mut self, scored: &[ScoredGenome]) -> Vec<Brain> {
        if scored.is_empty() {
            return self.fresh_population();
        }

        let mut rng = rand::thread_rng();

        // Rank by fitness, best first
        let mut ranked: Vec<&ScoredGenome> = scored.iter().collect();
        ranked.sort_by(|a, b| {
            b.fitness
                .partial_cmp(&a.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut next = Vec::with_capacity(self.population_size);

        // Elites carry over unchanged
        let elite_count = ((self.population_size as f32 * self.elitism_rate).ceil() as usize)
            .min(ranked.len())
            .min(self.population_size);
        for elite in ranked.iter().take(elite_count) {
            next.push(elite.brain.clone());
        }

        // Fill the rest with tournament winners, occasionally crossed over,
        // always mutated
        while next.len() < self.population_size {
            let parent = self.select_parent(scored, &mut rng);

            let mut child = if rng.gen::<f32>() < self.crossover_rate {
                let mate = self.select_parent(scored, &mut rng);
                parent.brain.crossover(
                    &mate.brain,
                    parent.fitness,
                    mate.fitness,
                    &self.crossover_strategy,
                )
            } else {
                parent.brain.clone()
            };

            child.mutate(&self.mutation_config);
            next.push(child);
        }

        next
    }
}
