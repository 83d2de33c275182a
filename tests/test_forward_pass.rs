//! Tests for forward propagation
//!
//! Covers the layer contract, the blueprint shape invariant, determinism of
//! repeated forward passes and the per-class score vectors.

use approx::assert_relative_eq;
use digit_ensemble::classifier::Classifier;
use digit_ensemble::layers::DenseLayer;
use digit_ensemble::mapping::{ClassMapping, NeuronClass};
use digit_ensemble::network::{Network, DEFAULT_WEIGHT_BOUND};
use digit_ensemble::utils::activations::sigmoid;
use digit_ensemble::utils::{Activation, SimpleRng};

fn build(widths: &[usize], mapping: ClassMapping, seed: u64) -> Network {
    let mut rng = SimpleRng::new(seed);
    Network::from_blueprint(
        widths,
        mapping,
        Activation::sigmoid(),
        DEFAULT_WEIGHT_BOUND,
        &mut rng,
    )
}

fn input(width: usize) -> Vec<f64> {
    (0..width).map(|i| (i % 17) as f64 / 16.0).collect()
}

// ============================================================================
// Layer Tests
// ============================================================================

mod layer_tests {
    use super::*;

    #[test]
    fn test_activate_matches_formula() {
        let layer = DenseLayer::from_parts(
            vec![vec![0.5, -1.0, 2.0], vec![0.0, 0.25, 0.0]],
            vec![0.1, -0.3],
            Activation::sigmoid(),
        );
        let outputs = layer.activate(&[1.0, 2.0, 0.5]);

        assert_relative_eq!(outputs[0], sigmoid(0.1 + 0.5 - 2.0 + 1.0));
        assert_relative_eq!(outputs[1], sigmoid(-0.3 + 0.5));
    }

    #[test]
    fn test_activate_is_side_effect_free() {
        let layer = DenseLayer::from_parts(vec![vec![0.3, 0.7]], vec![0.2], Activation::tanh());
        let before = layer.weights().to_vec();
        layer.activate(&[1.0, -1.0]);
        assert_eq!(layer.weights(), &before[..]);
    }

    #[test]
    #[should_panic(expected = "input length mismatch")]
    fn test_activate_wrong_length_panics() {
        let layer = DenseLayer::from_parts(vec![vec![0.3, 0.7]], vec![0.2], Activation::sigmoid());
        layer.activate(&[1.0]);
    }
}

// ============================================================================
// Network Shape Tests
// ============================================================================

mod shape_tests {
    use super::*;

    #[test]
    fn test_output_length_matches_last_width() {
        let blueprints: [(&[usize], ClassMapping); 4] = [
            (&[4, 10], ClassMapping::identity()),
            (&[64, 24, 6], ClassMapping::specialist(&[0, 1, 3, 6, 9]).unwrap()),
            (&[9, 7, 5, 3], ClassMapping::specialist(&[2, 8]).unwrap()),
            (&[192, 32, 32, 10], ClassMapping::identity()),
        ];

        for (widths, mapping) in blueprints {
            let network = build(widths, mapping, 1);
            let outputs = network.forward(&input(widths[0]));
            assert_eq!(outputs.len(), widths[widths.len() - 1]);
            assert_eq!(network.widths(), widths.to_vec());
        }
    }

    #[test]
    fn test_sigmoid_outputs_in_unit_interval() {
        let network = build(&[16, 8, 10], ClassMapping::identity(), 2);
        for value in network.forward(&input(16)) {
            assert!(value > 0.0 && value < 1.0);
        }
    }

    #[test]
    #[should_panic(expected = "input length mismatch")]
    fn test_forward_wrong_length_panics() {
        let network = build(&[16, 8, 10], ClassMapping::identity(), 2);
        network.forward(&input(15));
    }
}

// ============================================================================
// Determinism Tests
// ============================================================================

mod determinism_tests {
    use super::*;

    #[test]
    fn test_repeated_forward_is_bit_identical() {
        let network = build(&[64, 24, 6], ClassMapping::specialist(&[2, 4, 5, 7, 8]).unwrap(), 5);
        let sample = input(64);

        let first = network.forward(&sample);
        let second = network.forward(&sample);
        assert_eq!(first, second);
        assert_eq!(network.estimate(&sample), network.estimate(&sample));
    }

    #[test]
    fn test_same_seed_same_outputs() {
        let a = build(&[8, 6, 10], ClassMapping::identity(), 77);
        let b = build(&[8, 6, 10], ClassMapping::identity(), 77);
        assert_eq!(a.forward(&input(8)), b.forward(&input(8)));
    }
}

// ============================================================================
// Classification Tests
// ============================================================================

mod classification_tests {
    use super::*;

    #[test]
    fn test_classify_maps_neuron_through_mapping() {
        // Neuron 2 of the specialist stands for digit 5.
        let mut biases = vec![0.0; 4];
        biases[2] = 3.0;
        let layer = DenseLayer::from_parts(vec![vec![0.0; 3]; 4], biases, Activation::sigmoid());
        let network =
            Network::from_layers(vec![layer], ClassMapping::specialist(&[1, 9, 5]).unwrap());

        assert_eq!(network.predict(&[0.0; 3]), NeuronClass::Class(5));
        assert_eq!(network.classify(&[0.0; 3]), 5);
    }

    #[test]
    fn test_specialist_scores_are_summable() {
        let network = build(&[8, 6, 4], ClassMapping::specialist(&[1, 9, 5]).unwrap(), 4);
        let outputs = network.forward(&input(8));
        let scores = network.estimate(&input(8));

        assert_eq!(scores[1], outputs[0]);
        assert_eq!(scores[9], outputs[1]);
        assert_eq!(scores[5], outputs[2]);
        for class in [0, 2, 3, 4, 6, 7, 8] {
            assert_eq!(scores[class], outputs[3]);
        }
    }
}
