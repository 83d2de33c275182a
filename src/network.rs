//! Feed-forward network built from a blueprint of layer widths.

use crate::classifier::{arg_max, Classifier, Scores};
use crate::layers::DenseLayer;
use crate::mapping::{ClassMapping, NeuronClass, CLASS_COUNT};
use crate::utils::{Activation, SimpleRng};

/// Default half-width of the weight initialisation range.
pub const DEFAULT_WEIGHT_BOUND: f64 = 0.25;

/// Ordered stack of dense layers plus the output class mapping.
///
/// The input layer is implicit: a blueprint `[64, 24, 6]` materialises two
/// layers, 64 → 24 and 24 → 6.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<DenseLayer>,
    mapping: ClassMapping,
}

impl Network {
    /// Builds an untrained network from a blueprint of widths.
    ///
    /// `widths[0]` is the input dimensionality; each following width becomes a
    /// layer fed by the previous width.
    ///
    /// # Panics
    ///
    /// Panics if the blueprint has fewer than two widths, contains a zero
    /// width, or if the output width differs from the mapping's neuron count.
    ///
    /// # Example
    ///
    /// ```
    /// use digit_ensemble::mapping::ClassMapping;
    /// use digit_ensemble::network::{Network, DEFAULT_WEIGHT_BOUND};
    /// use digit_ensemble::utils::{Activation, SimpleRng};
    ///
    /// let mut rng = SimpleRng::new(1);
    /// let network = Network::from_blueprint(
    ///     &[64, 24, 10],
    ///     ClassMapping::identity(),
    ///     Activation::sigmoid(),
    ///     DEFAULT_WEIGHT_BOUND,
    ///     &mut rng,
    /// );
    /// assert_eq!(network.layers().len(), 2);
    /// assert_eq!(network.forward(&[0.0; 64]).len(), 10);
    /// ```
    pub fn from_blueprint(
        widths: &[usize],
        mapping: ClassMapping,
        activation: Activation,
        weight_bound: f64,
        rng: &mut SimpleRng,
    ) -> Self {
        assert!(
            widths.len() >= 2,
            "blueprint needs an input width and at least one layer"
        );
        assert!(
            widths.iter().all(|&width| width > 0),
            "blueprint widths must be positive"
        );

        let layers = widths
            .windows(2)
            .map(|pair| DenseLayer::new(pair[0], pair[1], activation, weight_bound, rng))
            .collect();

        Self::from_layers(layers, mapping)
    }

    /// Wraps already-built layers.
    ///
    /// # Panics
    ///
    /// Panics if `layers` is empty, if consecutive layers do not chain, or if
    /// the output width differs from the mapping's neuron count.
    pub fn from_layers(layers: Vec<DenseLayer>, mapping: ClassMapping) -> Self {
        assert!(!layers.is_empty(), "network needs at least one layer");
        for (index, pair) in layers.windows(2).enumerate() {
            assert_eq!(
                pair[0].output_size(),
                pair[1].input_size(),
                "layer {} output does not feed layer {}",
                index,
                index + 1
            );
        }
        let outputs = layers[layers.len() - 1].output_size();
        assert_eq!(
            outputs,
            mapping.neuron_count(),
            "output width must match the class mapping"
        );

        Self { layers, mapping }
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.layers
    }

    pub fn mapping(&self) -> &ClassMapping {
        &self.mapping
    }

    /// Width of the implicit input layer.
    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    /// The blueprint this network currently has, input width first.
    pub fn widths(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers.iter().map(DenseLayer::output_size))
            .collect()
    }

    /// Folds the features through every layer and returns the output activations.
    pub fn forward(&self, features: &[f64]) -> Vec<f64> {
        let mut carry = self.layers[0].activate(features);
        for layer in &self.layers[1..] {
            carry = layer.activate(&carry);
        }
        carry
    }

    /// Activation vector at every layer boundary.
    ///
    /// Row 0 is the raw input, row `k + 1` the output of layer `k`.
    pub fn activations(&self, features: &[f64]) -> Vec<Vec<f64>> {
        let mut rows = Vec::with_capacity(self.layers.len() + 1);
        rows.push(features.to_vec());
        for layer in &self.layers {
            let next = layer.activate(&rows[rows.len() - 1]);
            rows.push(next);
        }
        rows
    }

    /// Neuron with the highest activation, mapped to what it stands for.
    ///
    /// Ties go to the lowest neuron index. A specialist may answer
    /// [`NeuronClass::Abstain`].
    pub fn predict(&self, features: &[f64]) -> NeuronClass {
        let outputs = self.forward(features);
        self.mapping.class_of(arg_max(&outputs))
    }

    /// Inserts a copy of the last hidden layer in front of the output layer.
    ///
    /// The network grows deeper without discarding what the copied layer has
    /// learned.
    ///
    /// # Panics
    ///
    /// Panics if there is no hidden layer, or if the last hidden layer is not
    /// square (its copy could not be fed by its own output otherwise).
    pub fn expand(&mut self) {
        assert!(
            self.layers.len() >= 2,
            "expand requires at least one hidden layer"
        );
        let hidden = &self.layers[self.layers.len() - 2];
        assert_eq!(
            hidden.input_size(),
            hidden.output_size(),
            "expand requires a square last hidden layer"
        );
        let copy = hidden.clone();
        let at = self.layers.len() - 1;
        self.layers.insert(at, copy);
    }
}

impl Classifier for Network {
    /// Best-scoring neuron that stands for a digit.
    ///
    /// Abstain neurons are skipped, so a specialist always names one of the
    /// digits it covers. For a full network this is exactly [`Network::predict`].
    fn classify(&self, features: &[f64]) -> u8 {
        let outputs = self.forward(features);
        let mut best: Option<(u8, f64)> = None;
        for (neuron, &score) in outputs.iter().enumerate() {
            if let NeuronClass::Class(class) = self.mapping.class_of(neuron) {
                if best.map_or(true, |(_, top)| score > top) {
                    best = Some((class, score));
                }
            }
        }
        best.map_or(0, |(class, _)| class)
    }

    /// Scores every digit from the output neurons.
    ///
    /// Classes outside the network's competence receive the activation of the
    /// abstain neuron they are routed to, the network's confidence that the
    /// digit is not one of its own.
    fn estimate(&self, features: &[f64]) -> Scores {
        let outputs = self.forward(features);
        let mut scores = [0.0; CLASS_COUNT];
        for (class, score) in scores.iter_mut().enumerate() {
            *score = outputs[self.mapping.neuron_for(class as u8)];
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(widths: &[usize], mapping: ClassMapping) -> Network {
        let mut rng = SimpleRng::new(3);
        Network::from_blueprint(
            widths,
            mapping,
            Activation::sigmoid(),
            DEFAULT_WEIGHT_BOUND,
            &mut rng,
        )
    }

    /// Single-layer network whose output equals sigmoid(bias) for a zero input.
    fn biased(biases: Vec<f64>, mapping: ClassMapping) -> Network {
        let weights = vec![vec![0.0; 2]; biases.len()];
        let layer = DenseLayer::from_parts(weights, biases, Activation::sigmoid());
        Network::from_layers(vec![layer], mapping)
    }

    #[test]
    fn test_blueprint_shapes() {
        let mapping = ClassMapping::specialist(&[0, 1, 3, 6, 9]).unwrap();
        let network = network(&[64, 24, 6], mapping);
        assert_eq!(network.widths(), vec![64, 24, 6]);
        assert_eq!(network.layers()[1].input_size(), 24);
    }

    #[test]
    fn test_activations_include_input_row() {
        let network = network(&[4, 3, 10], ClassMapping::identity());
        let rows = network.activations(&[1.0, 0.0, 1.0, 0.0]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![1.0, 0.0, 1.0, 0.0]);
        assert_eq!(rows[2], network.forward(&[1.0, 0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_classify_ties_go_to_lowest_neuron() {
        let mut biases = vec![0.0; 10];
        biases[4] = 1.0;
        biases[7] = 1.0;
        let network = biased(biases, ClassMapping::identity());
        assert_eq!(network.classify(&[0.0, 0.0]), 4);
        assert_eq!(network.predict(&[0.0, 0.0]), NeuronClass::Class(4));
    }

    #[test]
    fn test_specialist_estimate_prefills_uncovered() {
        let mapping = ClassMapping::specialist(&[2, 4, 5, 7, 8]).unwrap();
        let network = biased(vec![0.0, 1.0, 0.0, 0.0, 0.0, 2.0], mapping);
        let outputs = network.forward(&[0.0, 0.0]);
        let scores = network.estimate(&[0.0, 0.0]);

        for class in [0, 1, 3, 6, 9] {
            assert_eq!(scores[class], outputs[5]);
        }
        assert_eq!(scores[4], outputs[1]);
        assert_eq!(scores[2], outputs[0]);
    }

    #[test]
    fn test_estimate_reads_each_routed_abstain_neuron() {
        // Digit 0 on neuron 0; 1..=4 abstain on neuron 1, 5..=9 on neuron 2.
        let neurons = vec![
            NeuronClass::Class(0),
            NeuronClass::Abstain,
            NeuronClass::Abstain,
        ];
        let mapping = ClassMapping::new(neurons, [0, 1, 1, 1, 1, 2, 2, 2, 2, 2]).unwrap();
        let network = biased(vec![0.5, -1.0, 2.0], mapping);
        let outputs = network.forward(&[0.0, 0.0]);
        let scores = network.estimate(&[0.0, 0.0]);

        assert_eq!(scores[0], outputs[0]);
        for class in 1..=4 {
            assert_eq!(scores[class], outputs[1]);
        }
        for class in 5..=9 {
            assert_eq!(scores[class], outputs[2]);
        }
    }

    #[test]
    fn test_specialist_classify_skips_abstain() {
        let mapping = ClassMapping::specialist(&[2, 4, 5, 7, 8]).unwrap();
        let network = biased(vec![0.0, 1.0, 0.0, 0.0, 0.0, 2.0], mapping);
        assert_eq!(network.predict(&[0.0, 0.0]), NeuronClass::Abstain);
        assert_eq!(network.classify(&[0.0, 0.0]), 4);
    }

    #[test]
    fn test_identity_estimate_is_forward_output() {
        let biases: Vec<f64> = (0..10).map(|b| b as f64 / 10.0).collect();
        let network = biased(biases, ClassMapping::identity());
        let outputs = network.forward(&[0.0, 0.0]);
        assert_eq!(network.estimate(&[0.0, 0.0]).to_vec(), outputs);
    }

    #[test]
    fn test_expand_duplicates_last_hidden_layer() {
        let mut network = network(&[8, 5, 5, 10], ClassMapping::identity());
        let hidden = network.layers()[1].clone();
        network.expand();

        assert_eq!(network.widths(), vec![8, 5, 5, 5, 10]);
        assert_eq!(network.layers()[2].weights(), hidden.weights());
        assert_eq!(network.forward(&[0.5; 8]).len(), 10);
    }

    #[test]
    #[should_panic(expected = "square last hidden layer")]
    fn test_expand_rejects_non_square_hidden() {
        let mut network = network(&[8, 5, 10], ClassMapping::identity());
        network.expand();
    }

    #[test]
    #[should_panic(expected = "output width must match the class mapping")]
    fn test_blueprint_mapping_mismatch() {
        network(&[4, 3, 7], ClassMapping::identity());
    }
}
