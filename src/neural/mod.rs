//! Neural network controllers for the birds.
//!
//! Dense-layer feedforward networks with:
//! - Weight mutations
//! - Structural mutations (insert hidden layers)
//! - Crossover between networks

mod crossover;
mod mutations;
mod network;

pub use crossover::CrossoverStrategy;
pub use mutations::MutationConfig;
pub use network::{Brain, Layer, N_INPUTS, N_OUTPUTS};
