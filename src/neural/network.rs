//! Network structure and forward propagation.

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Controller inputs: bird y, distance to gap top, distance to gap bottom
pub const N_INPUTS: usize = 3;

/// Controller outputs: a single jump signal
pub const N_OUTPUTS: usize = 1;

/// A single dense layer
#[derive(Clone, Debug)]
pub struct Layer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
}

impl Serialize for Layer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let shape = self.weights.shape();
        let weights: Vec<f32> = self.weights.iter().copied().collect();
        let biases: Vec<f32> = self.biases.iter().copied().collect();

        let mut state = serializer.serialize_struct("Layer", 3)?;
        state.serialize_field("shape", &[shape[0], shape[1]])?;
        state.serialize_field("weights", &weights)?;
        state.serialize_field("biases", &biases)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct LayerData {
            shape: [usize; 2],
            weights: Vec<f32>,
            biases: Vec<f32>,
        }

        let data = LayerData::deserialize(deserializer)?;
        let weights = Array2::from_shape_vec((data.shape[0], data.shape[1]), data.weights)
            .map_err(serde::de::Error::custom)?;
        let biases = Array1::from_vec(data.biases);

        Ok(Layer { weights, biases })
    }
}

/// A bird's controller: feedforward network with tanh activation.
///
/// New genomes start minimal (one dense layer, no hidden neurons); structure
/// grows only through mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Brain {
    /// Number of input neurons
    pub n_inputs: usize,
    /// Number of output neurons
    pub n_outputs: usize,
    /// Hidden layer sizes
    pub hidden_sizes: Vec<usize>,
    /// Network layers
    pub layers: Vec<Layer>,
}

impl Brain {
    /// Create a minimal network with no hidden layers and random weights
    pub fn new_minimal(n_inputs: usize, n_outputs: usize) -> Self {
        let mut rng = rand::thread_rng();

        let weights = Array2::from_shape_fn((n_inputs, n_outputs), |_| rng.gen_range(-0.5..0.5));
        let biases = Array1::zeros(n_outputs);

        Self {
            n_inputs,
            n_outputs,
            hidden_sizes: Vec::new(),
            layers: vec![Layer { weights, biases }],
        }
    }

    /// Perform a forward pass through the network
    #[inline]
    pub fn forward(&self, inputs: &[f32]) -> Vec<f32> {
        debug_assert_eq!(inputs.len(), self.n_inputs);

        let mut activation = Array1::from_vec(inputs.to_vec());

        for layer in &self.layers {
            activation = activation.dot(&layer.weights) + &layer.biases;
            activation.mapv_inplace(|x| x.tanh());
        }

        activation.to_vec()
    }

    /// Total number of hidden neurons (complexity metric)
    #[inline]
    pub fn complexity(&self) -> usize {
        self.hidden_sizes.iter().sum::<usize>()
    }

    /// Total number of parameters (weights + biases)
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }

    /// Check that no weight or bias is NaN/Inf
    pub fn is_valid(&self) -> bool {
        self.layers.iter().all(|layer| {
            layer.weights.iter().all(|w| w.is_finite())
                && layer.biases.iter().all(|b| b.is_finite())
        })
    }
}
