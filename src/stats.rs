//! Per-generation statistics tracking.

use crate::evolution::ScoredGenome;
use serde::{Deserialize, Serialize};

/// Statistics snapshot for one completed generation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (1-based)
    pub generation: u32,
    /// Frames the generation survived
    pub frames: u64,
    /// Pipes passed during the generation
    pub score: u32,
    /// Best fitness in the scored population
    pub best_fitness: f32,
    /// Mean fitness across the scored population
    pub mean_fitness: f32,
    /// Mean brain complexity (hidden neurons)
    pub brain_mean: f32,
    /// Maximum brain complexity
    pub brain_max: usize,
    /// Agents still alive when the generation ended (frame cap only)
    pub survivors: usize,
}

impl GenerationStats {
    /// Compute stats from a scored population
    pub fn from_scored(
        generation: u32,
        frames: u64,
        score: u32,
        survivors: usize,
        scored: &[ScoredGenome],
    ) -> Self {
        let mut stats = Self {
            generation,
            frames,
            score,
            survivors,
            ..Self::default()
        };

        if !scored.is_empty() {
            stats.best_fitness = scored
                .iter()
                .map(|s| s.fitness)
                .fold(f32::NEG_INFINITY, f32::max);
            stats.mean_fitness =
                scored.iter().map(|s| s.fitness).sum::<f32>() / scored.len() as f32;

            let complexities: Vec<usize> = scored.iter().map(|s| s.brain.complexity()).collect();
            stats.brain_mean =
                complexities.iter().sum::<usize>() as f32 / scored.len() as f32;
            stats.brain_max = complexities.into_iter().max().unwrap_or(0);
        }

        stats
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "Gen:{:4} | Score:{:4} | Frames:{:6} | Best:{:8.1} | Mean:{:7.1} | Brain:{:.1}",
            self.generation,
            self.score,
            self.frames,
            self.best_fitness,
            self.mean_fitness,
            self.brain_mean,
        )
    }
}

/// Historical statistics across generations
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded generation snapshots
    pub snapshots: Vec<GenerationStats>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation snapshot
    pub fn record(&mut self, stats: GenerationStats) {
        self.snapshots.push(stats);
    }

    /// Number of recorded generations
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Score over generations
    pub fn score_series(&self) -> Vec<(u32, u32)> {
        self.snapshots
            .iter()
            .map(|s| (s.generation, s.score))
            .collect()
    }

    /// Best fitness over generations
    pub fn fitness_series(&self) -> Vec<(u32, f32)> {
        self.snapshots
            .iter()
            .map(|s| (s.generation, s.best_fitness))
            .collect()
    }

    /// Best score seen across all generations
    pub fn best_score(&self) -> u32 {
        self.snapshots.iter().map(|s| s.score).max().unwrap_or(0)
    }

    /// Save history to a JSON file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from a JSON file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::{Brain, N_INPUTS, N_OUTPUTS};

    fn scored(fitnesses: &[f32]) -> Vec<ScoredGenome> {
        fitnesses
            .iter()
            .map(|&fitness| ScoredGenome {
                brain: Brain::new_minimal(N_INPUTS, N_OUTPUTS),
                fitness,
            })
            .collect()
    }

    #[test]
    fn test_stats_from_scored() {
        let stats = GenerationStats::from_scored(3, 500, 4, 0, &scored(&[1.0, 2.0, 6.0]));

        assert_eq!(stats.generation, 3);
        assert_eq!(stats.score, 4);
        assert_eq!(stats.best_fitness, 6.0);
        assert_eq!(stats.mean_fitness, 3.0);
        assert_eq!(stats.brain_max, 0);
    }

    #[test]
    fn test_stats_empty_population() {
        let stats = GenerationStats::from_scored(1, 0, 0, 0, &[]);
        assert_eq!(stats.best_fitness, 0.0);
        assert_eq!(stats.mean_fitness, 0.0);
    }

    #[test]
    fn test_history_series() {
        let mut history = StatsHistory::new();

        for gen in 1..=5u32 {
            let mut stats = GenerationStats::default();
            stats.generation = gen;
            stats.score = gen * 2;
            history.record(stats);
        }

        let series = history.score_series();
        assert_eq!(series.len(), 5);
        assert_eq!(series[0], (1, 2));
        assert_eq!(series[4], (5, 10));
        assert_eq!(history.best_score(), 10);
    }

    #[test]
    fn test_history_json_roundtrip() {
        let mut history = StatsHistory::new();
        history.record(GenerationStats::from_scored(1, 120, 1, 0, &scored(&[5.0])));

        let path = "/tmp/flapnet_test_history.json";
        history.save(path).unwrap();
        let loaded = StatsHistory::load(path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.snapshots[0].frames, 120);
        std::fs::remove_file(path).ok();
    }
}
