//! Crossover between brains.

use super::network::Brain;
use rand::Rng;

/// Strategy for combining two parent brains
#[derive(Clone, Debug, Default)]
pub enum CrossoverStrategy {
    /// Inherit structure from the fitter parent, mixing in some weights
    #[default]
    FitterParent,
    /// Average weights from both parents
    Average,
    /// Randomly select each weight from either parent
    Uniform,
}

impl Brain {
    /// Crossover with another brain using the given strategy
    pub fn crossover(
        &self,
        other: &Self,
        fitness_self: f32,
        fitness_other: f32,
        strategy: &CrossoverStrategy,
    ) -> Self {
        match strategy {
            CrossoverStrategy::FitterParent => {
                self.crossover_fitter_parent(other, fitness_self, fitness_other)
            }
            CrossoverStrategy::Average => self.crossover_average(other),
            CrossoverStrategy::Uniform => self.crossover_uniform(other),
        }
    }

    /// Inherit structure from the fitter parent; 20% of compatible weights
    /// come from the other parent.
    fn crossover_fitter_parent(&self, other: &Self, fitness_self: f32, fitness_other: f32) -> Self {
        let mut rng = rand::thread_rng();

        let (primary, secondary) = if fitness_self >= fitness_other {
            (self, other)
        } else {
            (other, self)
        };

        let mut child = primary.clone();

        for (child_layer, sec_layer) in child.layers.iter_mut().zip(secondary.layers.iter()) {
            let (rows, cols) = child_layer.weights.dim();
            let (sec_rows, sec_cols) = sec_layer.weights.dim();

            // Only mix where dimensions agree
            for i in 0..rows.min(sec_rows) {
                for j in 0..cols.min(sec_cols) {
                    if rng.gen::<f32>() < 0.2 {
                        child_layer.weights[[i, j]] = sec_layer.weights[[i, j]];
                    }
                }
            }

            for i in 0..child_layer.biases.len().min(sec_layer.biases.len()) {
                if rng.gen::<f32>() < 0.2 {
                    child_layer.biases[i] = sec_layer.biases[i];
                }
            }
        }

        child
    }

    /// Average compatible weights from both parents
    fn crossover_average(&self, other: &Self) -> Self {
        let mut child = self.clone();

        for (child_layer, other_layer) in child.layers.iter_mut().zip(other.layers.iter()) {
            let (rows, cols) = child_layer.weights.dim();
            let (o_rows, o_cols) = other_layer.weights.dim();

            for i in 0..rows.min(o_rows) {
                for j in 0..cols.min(o_cols) {
                    child_layer.weights[[i, j]] =
                        (child_layer.weights[[i, j]] + other_layer.weights[[i, j]]) / 2.0;
                }
            }

            for i in 0..child_layer.biases.len().min(other_layer.biases.len()) {
                child_layer.biases[i] = (child_layer.biases[i] + other_layer.biases[i]) / 2.0;
            }
        }

        child
    }

    /// Randomly select each compatible weight from either parent
    fn crossover_uniform(&self, other: &Self) -> Self {
        let mut rng = rand::thread_rng();
        let mut child = self.clone();

        for (child_layer, other_layer) in child.layers.iter_mut().zip(other.layers.iter()) {
            let (rows, cols) = child_layer.weights.dim();
            let (o_rows, o_cols) = other_layer.weights.dim();

            for i in 0..rows.min(o_rows) {
                for j in 0..cols.min(o_cols) {
                    if rng.gen::<bool>() {
                        child_layer.weights[[i, j]] = other_layer.weights[[i, j]];
                    }
                }
            }

            for i in 0..child_layer.biases.len().min(other_layer.biases.len()) {
                if rng.gen::<bool>() {
                    child_layer.biases[i] = other_layer.biases[i];
                }
            }
        }

        child
    }
}
