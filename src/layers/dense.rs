//! Dense (fully connected) layer implementation
//!
//! This module provides a DenseLayer that performs the transformation:
//! output = f(weights × input + biases), `f` being the layer's activation.

use crate::utils::{Activation, SimpleRng};

/// Dense (fully connected) layer with weights, biases and a nonlinearity.
///
/// # Fields
///
/// * `input_size` - Number of input features
/// * `output_size` - Number of neurons
/// * `weights` - Weight matrix stored in row-major format (output_size × input_size),
///   so row `j` holds every incoming weight of neuron `j`
/// * `biases` - Bias vector (output_size)
/// * `activation` - Nonlinearity applied to each neuron's net value
///
/// # Example
///
/// ```
/// use digit_ensemble::layers::DenseLayer;
/// use digit_ensemble::utils::{Activation, SimpleRng};
///
/// let mut rng = SimpleRng::new(42);
/// let layer = DenseLayer::new(64, 24, Activation::sigmoid(), 0.25, &mut rng);
/// assert_eq!(layer.input_size(), 64);
/// assert_eq!(layer.output_size(), 24);
/// ```
#[derive(Debug, Clone)]
pub struct DenseLayer {
    input_size: usize,
    output_size: usize,
    weights: Vec<f64>,
    biases: Vec<f64>,
    activation: Activation,
}

impl DenseLayer {
    /// Create a new DenseLayer with uniformly random weights.
    ///
    /// Every weight is drawn independently from `[-weight_bound, weight_bound)`.
    /// Biases start at zero, which is safe because the activation at net 0 is
    /// still well defined.
    ///
    /// # Arguments
    ///
    /// * `input_size` - Number of input features
    /// * `output_size` - Number of neurons
    /// * `activation` - Nonlinearity for this layer
    /// * `weight_bound` - Half-width of the initialisation range
    /// * `rng` - Random number generator for weight initialization
    pub fn new(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        weight_bound: f64,
        rng: &mut SimpleRng,
    ) -> Self {
        let weights = (0..input_size * output_size)
            .map(|_| rng.gen_range_f64(-weight_bound, weight_bound))
            .collect();

        Self {
            input_size,
            output_size,
            weights,
            biases: vec![0.0; output_size],
            activation,
        }
    }

    /// Builds a layer from explicit per-neuron weight rows and biases.
    ///
    /// # Panics
    ///
    /// Panics if the rows are ragged, empty, or if the bias count differs from
    /// the number of rows.
    pub fn from_parts(weights: Vec<Vec<f64>>, biases: Vec<f64>, activation: Activation) -> Self {
        assert!(!weights.is_empty(), "layer must have at least one neuron");
        assert_eq!(
            weights.len(),
            biases.len(),
            "one bias is required per neuron"
        );
        let input_size = weights[0].len();
        assert!(
            weights.iter().all(|row| row.len() == input_size),
            "every neuron must have {} weights",
            input_size
        );

        Self {
            input_size,
            output_size: biases.len(),
            weights: weights.into_iter().flatten().collect(),
            biases,
            activation,
        }
    }

    /// Computes `f(bias[j] + Σ_i weights[j][i] * input[i])` for every neuron `j`.
    ///
    /// # Panics
    ///
    /// Panics if `input.len()` differs from the layer's input size.
    pub fn activate(&self, input: &[f64]) -> Vec<f64> {
        assert_eq!(
            input.len(),
            self.input_size,
            "input length mismatch in DenseLayer::activate"
        );

        self.weights
            .chunks_exact(self.input_size)
            .zip(&self.biases)
            .map(|(row, &bias)| {
                let net = row
                    .iter()
                    .zip(input)
                    .fold(bias, |acc, (w, x)| acc + w * x);
                self.activation.squash(net)
            })
            .collect()
    }

    /// Get the input size of the layer.
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Get the output size of the layer.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Get the number of trainable parameters.
    ///
    /// Returns input_size × output_size (weights) + output_size (biases).
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Flat row-major weight matrix.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Incoming weights of one neuron.
    pub fn neuron_weights(&self, neuron: usize) -> &[f64] {
        let start = neuron * self.input_size;
        &self.weights[start..start + self.input_size]
    }

    /// Weight connecting input `input` to neuron `neuron`.
    pub fn weight(&self, neuron: usize, input: usize) -> f64 {
        self.weights[neuron * self.input_size + input]
    }

    pub(crate) fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    pub(crate) fn biases_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }
}
