//! Backpropagation trainer with mini-batch commits.

use crate::config::TrainingConfig;
use crate::dataset::Sample;
use crate::network::Network;
use crate::training::Nudges;
use crate::utils::LRScheduler;
use log::{debug, info, trace};
use std::time::Instant;

/// Outcome of a single epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochStats {
    pub epoch: usize,
    pub learning_rate: f64,
    /// Squared output error averaged over the epoch's samples, measured before
    /// each sample's own update.
    pub mean_squared_error: f64,
}

/// Drives epochs over a training set and updates a network in place.
///
/// Per sample, the trainer forward-propagates (caching every layer boundary),
/// computes the output error for a squared-error loss, walks the layers
/// backwards and accumulates learning-rate-scaled gradients into its
/// [`Nudges`]. The accumulated nudges are averaged and subtracted from the
/// network whenever the sample index is a multiple of the batch size, and
/// once more at the end of every epoch.
///
/// # Example
///
/// ```
/// use digit_ensemble::dataset::Sample;
/// use digit_ensemble::mapping::ClassMapping;
/// use digit_ensemble::network::{Network, DEFAULT_WEIGHT_BOUND};
/// use digit_ensemble::training::Trainer;
/// use digit_ensemble::utils::{Activation, ConstantLR, SimpleRng};
///
/// let mut rng = SimpleRng::new(5);
/// let mut network = Network::from_blueprint(
///     &[4, 3, 10],
///     ClassMapping::identity(),
///     Activation::sigmoid(),
///     DEFAULT_WEIGHT_BOUND,
///     &mut rng,
/// );
/// let data = vec![Sample::new(vec![1.0, 0.0, 1.0, 0.0], 1)];
///
/// let history = Trainer::new(&mut network, &data, Box::new(ConstantLR::new(0.5)), 3, 1).train();
/// assert_eq!(history.len(), 3);
/// ```
pub struct Trainer<'a> {
    network: &'a mut Network,
    data: &'a [Sample],
    scheduler: Box<dyn LRScheduler + Send>,
    epochs: usize,
    batch_size: usize,
    nudges: Nudges,
}

impl<'a> Trainer<'a> {
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub fn new(
        network: &'a mut Network,
        data: &'a [Sample],
        scheduler: Box<dyn LRScheduler + Send>,
        epochs: usize,
        batch_size: usize,
    ) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        let nudges = Nudges::for_network(network);
        Self {
            network,
            data,
            scheduler,
            epochs,
            batch_size,
            nudges,
        }
    }

    /// Trainer with the schedule, epoch count and batch size of `config`.
    pub fn from_config(
        network: &'a mut Network,
        data: &'a [Sample],
        config: &TrainingConfig,
    ) -> Self {
        Self::new(
            network,
            data,
            config.scheduler(),
            config.epochs(),
            config.batch_size(),
        )
    }

    pub fn network(&self) -> &Network {
        &*self.network
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Samples accumulated since the last commit.
    pub fn pending_samples(&self) -> usize {
        self.nudges.samples()
    }

    /// Runs every epoch and returns their statistics in order.
    pub fn train(&mut self) -> Vec<EpochStats> {
        info!(
            "Training {:?} on {} samples for {} epochs (batch size {})",
            self.network.widths(),
            self.data.len(),
            self.epochs,
            self.batch_size
        );
        let start = Instant::now();

        let history: Vec<EpochStats> = (0..self.epochs)
            .map(|epoch| self.train_epoch(epoch))
            .collect();

        if let Some(last) = history.last() {
            info!(
                "Finished training {:?} in {:.2}s, final error {:.6}",
                self.network.widths(),
                start.elapsed().as_secs_f64(),
                last.mean_squared_error
            );
        }
        history
    }

    /// Runs one epoch at the scheduler's current rate, then advances the scheduler.
    pub fn train_epoch(&mut self, epoch: usize) -> EpochStats {
        let start = Instant::now();
        // Fixed before the first sample of the epoch.
        let learning_rate = self.scheduler.get_lr();
        let mut total_error = 0.0;

        let data = self.data;
        for (index, sample) in data.iter().enumerate() {
            total_error += self.learn_sample(sample, learning_rate);

            // Also fires on index 0, committing the first sample on its own.
            if index % self.batch_size == 0 {
                self.commit();
            }
        }
        self.commit();
        self.scheduler.step();

        let stats = EpochStats {
            epoch,
            learning_rate,
            mean_squared_error: if data.is_empty() {
                0.0
            } else {
                total_error / data.len() as f64
            },
        };
        debug!(
            "Epoch {}, LR: {:.6}, Error: {:.6}, Time: {:.3}s",
            epoch + 1,
            stats.learning_rate,
            stats.mean_squared_error,
            start.elapsed().as_secs_f64()
        );
        stats
    }

    /// Accumulates the nudges for one sample without touching the network.
    ///
    /// Returns the sample's squared output error before the update.
    ///
    /// # Panics
    ///
    /// Panics if the sample's feature count differs from the network's input
    /// width.
    pub fn learn_sample(&mut self, sample: &Sample, learning_rate: f64) -> f64 {
        let network = &*self.network;
        let layers = network.layers();
        let target = network.mapping().neuron_for(sample.label);
        let activations = network.activations(&sample.features);

        let outputs = &activations[layers.len()];
        let output_activation = layers[layers.len() - 1].activation();
        let mut squared_error = 0.0;
        let mut errors: Vec<f64> = outputs
            .iter()
            .enumerate()
            .map(|(neuron, &output)| {
                let expected = if neuron == target { 1.0 } else { 0.0 };
                squared_error += (expected - output) * (expected - output);
                -(expected - output) * output_activation.derivative(output)
            })
            .collect();

        for index in (0..layers.len()).rev() {
            let layer = &layers[index];
            let inputs = &activations[index];
            self.nudges.accumulate(index, inputs, &errors, learning_rate);

            if index > 0 {
                // Each input neuron's share of this layer's error.
                let derivative = layers[index - 1].activation();
                errors = inputs
                    .iter()
                    .enumerate()
                    .map(|(input, &activation)| {
                        let blame: f64 = errors
                            .iter()
                            .enumerate()
                            .map(|(neuron, error)| layer.weight(neuron, input) * error)
                            .sum();
                        derivative.derivative(activation) * blame
                    })
                    .collect();
            }
        }

        self.nudges.record_sample();
        squared_error
    }

    /// Applies the averaged nudges to the network.
    ///
    /// Returns `false` when nothing was accumulated since the last commit.
    pub fn commit(&mut self) -> bool {
        let pending = self.nudges.samples();
        let committed = self.nudges.commit(self.network);
        if committed {
            trace!("Committed nudges averaged over {} samples", pending);
        }
        committed
    }
}
