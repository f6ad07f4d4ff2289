//! Mutations on brain weights and structure.

use super::network::{Brain, Layer};
use ndarray::{Array1, Array2};
use rand::Rng;

/// Configuration for mutation operations
#[derive(Clone, Debug)]
pub struct MutationConfig {
    /// Probability of mutating each weight
    pub weight_mutation_rate: f32,
    /// Magnitude of weight perturbations
    pub weight_mutation_strength: f32,
    /// Probability of adding a hidden layer
    pub add_neuron_rate: f32,
    /// Probability of strengthening a random connection
    pub add_connection_rate: f32,
    /// Maximum hidden neurons allowed
    pub max_neurons: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            weight_mutation_rate: 0.05,
            weight_mutation_strength: 0.3,
            add_neuron_rate: 0.03,
            add_connection_rate: 0.05,
            max_neurons: 50,
        }
    }
}

impl Brain {
    /// Apply all mutations according to config
    pub fn mutate(&mut self, config: &MutationConfig) {
        let mut rng = rand::thread_rng();

        self.mutate_weights(config.weight_mutation_rate, config.weight_mutation_strength);

        if rng.gen::<f32>() < config.add_neuron_rate && self.complexity() < config.max_neurons {
            self.add_neurons();
        }

        if rng.gen::<f32>() < config.add_connection_rate {
            self.strengthen_connection();
        }
    }

    /// Perturb weights and biases with the given rate and strength
    pub fn mutate_weights(&mut self, rate: f32, strength: f32) {
        let mut rng = rand::thread_rng();

        for layer in &mut self.layers {
            layer.weights.mapv_inplace(|w| {
                if rng.gen::<f32>() < rate {
                    let delta = rng.gen_range(-strength..strength);
                    (w + delta).clamp(-5.0, 5.0)
                } else {
                    w
                }
            });

            layer.biases.mapv_inplace(|b| {
                if rng.gen::<f32>() < rate {
                    let delta = rng.gen_range(-strength..strength);
                    (b + delta).clamp(-5.0, 5.0)
                } else {
                    b
                }
            });
        }
    }

    /// Structural mutation: append a small hidden layer (2-6 neurons)
    pub fn add_neurons(&mut self) {
        let mut rng = rand::thread_rng();
        let layer_size = rng.gen_range(2..=6);
        let position = self.hidden_sizes.len();
        self.insert_hidden_layer(position, layer_size);
    }

    /// Strengthen a random existing connection
    pub fn strengthen_connection(&mut self) {
        let mut rng = rand::thread_rng();

        let layer_idx = rng.gen_range(0..self.layers.len());
        let layer = &mut self.layers[layer_idx];

        let (rows, cols) = layer.weights.dim();
        if rows > 0 && cols > 0 {
            let i = rng.gen_range(0..rows);
            let j = rng.gen_range(0..cols);
            layer.weights[[i, j]] += rng.gen_range(-0.5..0.5);
            layer.weights[[i, j]] = layer.weights[[i, j]].clamp(-5.0, 5.0);
        }
    }

    /// Insert a new hidden layer at the given position
    fn insert_hidden_layer(&mut self, position: usize, size: usize) {
        let mut rng = rand::thread_rng();

        let prev_size = if position == 0 {
            self.n_inputs
        } else {
            self.hidden_sizes[position - 1]
        };

        let next_size = if position >= self.hidden_sizes.len() {
            self.n_outputs
        } else {
            self.hidden_sizes[position]
        };

        // New layer: prev_size -> size
        let new_layer = Layer {
            weights: Array2::from_shape_fn((prev_size, size), |_| rng.gen_range(-0.3..0.3)),
            biases: Array1::zeros(size),
        };

        // Rebuild the following layer to accept the new width: size -> next_size
        if self.layers.len() > position {
            let biases_out = self.layers[position].biases.clone();
            self.layers[position] = Layer {
                weights: Array2::from_shape_fn((size, next_size), |_| rng.gen_range(-0.3..0.3)),
                biases: biases_out,
            };
        }

        self.layers.insert(position, new_layer);
        self.hidden_sizes.insert(position, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::{N_INPUTS, N_OUTPUTS};

    #[test]
    fn test_weight_mutation_changes_weights() {
        let mut brain = Brain::new_minimal(N_INPUTS, N_OUTPUTS);
        let original = brain.layers[0].weights.clone();

        brain.mutate_weights(1.0, 0.1); // 100% mutation rate

        let changed = brain.layers[0]
            .weights
            .iter()
            .zip(original.iter())
            .any(|(a, b)| (a - b).abs() > 1e-10);
        assert!(changed, "weights should change after mutation");
    }

    #[test]
    fn test_add_neurons_grows_structure() {
        let mut brain = Brain::new_minimal(N_INPUTS, N_OUTPUTS);
        assert_eq!(brain.complexity(), 0);

        brain.add_neurons();

        assert!(brain.complexity() >= 2);
        assert_eq!(brain.layers.len(), 2);

        // Forward pass must still produce a single finite output
        let outputs = brain.forward(&[100.0, 50.0, 25.0]);
        assert_eq!(outputs.len(), 1);
        assert!(outputs[0].is_finite());
    }

    #[test]
    fn test_mutation_preserves_validity() {
        let mut brain = Brain::new_minimal(N_INPUTS, N_OUTPUTS);

        let config = MutationConfig {
            weight_mutation_rate: 0.5,
            weight_mutation_strength: 1.0,
            add_neuron_rate: 0.5,
            add_connection_rate: 0.5,
            max_neurons: 12,
        };

        for _ in 0..100 {
            brain.mutate(&config);
        }

        assert!(brain.is_valid(), "brain should remain valid after mutations");
        assert!(brain.complexity() <= 12 + 6, "growth must respect the neuron cap");

        let outputs = brain.forward(&[350.0, 120.0, 80.0]);
        assert!(outputs.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_weight_clamping() {
        let mut brain = Brain::new_minimal(N_INPUTS, N_OUTPUTS);

        for _ in 0..1000 {
            brain.mutate_weights(1.0, 10.0);
        }

        for layer in &brain.layers {
            assert!(layer.weights.iter().all(|w| (-5.0..=5.0).contains(w)));
            assert!(layer.biases.iter().all(|b| (-5.0..=5.0).contains(b)));
        }
    }
}
