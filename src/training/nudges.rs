//! Gradient accumulator mirroring a network's weight and bias shapes.

use crate::network::Network;

/// Summed per-sample gradient contributions since the last commit.
///
/// Learning rate is already folded into every contribution, so committing is
/// plain averaging followed by subtraction.
#[derive(Debug, Clone)]
pub struct Nudges {
    weights: Vec<Vec<f64>>,
    biases: Vec<Vec<f64>>,
    samples: usize,
}

impl Nudges {
    /// Zeroed accumulator shaped like `network`.
    pub fn for_network(network: &Network) -> Self {
        Self {
            weights: network
                .layers()
                .iter()
                .map(|layer| vec![0.0; layer.weights().len()])
                .collect(),
            biases: network
                .layers()
                .iter()
                .map(|layer| vec![0.0; layer.output_size()])
                .collect(),
            samples: 0,
        }
    }

    /// Samples accumulated since the last commit.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }

    pub(crate) fn record_sample(&mut self) {
        self.samples += 1;
    }

    /// Adds one layer's contribution for one sample.
    ///
    /// Neuron `j` gains `inputs[i] * errors[j] * learning_rate` on weight `i`
    /// and `errors[j] * learning_rate` on its bias.
    pub(crate) fn accumulate(
        &mut self,
        layer: usize,
        inputs: &[f64],
        errors: &[f64],
        learning_rate: f64,
    ) {
        let weights = &mut self.weights[layer];
        let biases = &mut self.biases[layer];
        assert_eq!(
            weights.len(),
            inputs.len() * errors.len(),
            "nudge shape does not match layer {}",
            layer
        );

        for (neuron, &error) in errors.iter().enumerate() {
            let step = error * learning_rate;
            biases[neuron] += step;
            let row = &mut weights[neuron * inputs.len()..(neuron + 1) * inputs.len()];
            for (nudge, &input) in row.iter_mut().zip(inputs) {
                *nudge += input * step;
            }
        }
    }

    /// Averages the accumulated nudges, subtracts them from `network` and
    /// clears the accumulator.
    ///
    /// Returns `false` without touching anything when no sample has been
    /// accumulated since the last commit.
    pub fn commit(&mut self, network: &mut Network) -> bool {
        if self.samples == 0 {
            return false;
        }

        let scale = 1.0 / self.samples as f64;
        let layers = network.layers_mut();
        assert_eq!(
            layers.len(),
            self.weights.len(),
            "nudges were built for a different network"
        );

        for ((layer, weight_nudges), bias_nudges) in
            layers.iter_mut().zip(&self.weights).zip(&self.biases)
        {
            for (weight, nudge) in layer.weights_mut().iter_mut().zip(weight_nudges) {
                *weight -= nudge * scale;
            }
            for (bias, nudge) in layer.biases_mut().iter_mut().zip(bias_nudges) {
                *bias -= nudge * scale;
            }
        }

        self.clear();
        true
    }

    fn clear(&mut self) {
        for values in self.weights.iter_mut().chain(self.biases.iter_mut()) {
            values.fill(0.0);
        }
        self.samples = 0;
    }
}
