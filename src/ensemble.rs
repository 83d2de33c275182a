//! Nearest-neighbour classifier combined with specialist networks.
//!
//! Every member produces a ten-slot score vector; the ensemble sums them and
//! picks the best class. Specialists only know part of the digits, so the
//! nearest-neighbour scores break the ties their abstain neurons leave.

use crate::architecture::{build_networks, ArchitectureConfig};
use crate::classifier::{add_scores, arg_max, Classifier, Scores};
use crate::config::TrainingConfig;
use crate::dataset::Sample;
use crate::knn::NearestNeighbour;
use crate::network::Network;
use crate::training::{EpochStats, Trainer};
use crate::utils::{Activation, SimpleRng};
use log::info;
use rayon::prelude::*;
use std::error::Error;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Ensemble {
    knn: NearestNeighbour,
    specialists: Vec<Network>,
}

impl Ensemble {
    /// # Panics
    ///
    /// Panics if the specialists disagree on their input width.
    pub fn new(knn: NearestNeighbour, specialists: Vec<Network>) -> Self {
        if let Some(first) = specialists.first() {
            let width = first.input_size();
            assert!(
                specialists.iter().all(|network| network.input_size() == width),
                "specialists must share one input width"
            );
        }
        Self { knn, specialists }
    }

    /// Untrained networks described by `architecture`, plus a nearest-neighbour
    /// classifier over `training`.
    pub fn from_architecture(
        training: Vec<Sample>,
        architecture: &ArchitectureConfig,
        activation: Activation,
        weight_bound: f64,
        rng: &mut SimpleRng,
    ) -> Result<Self, Box<dyn Error>> {
        let specialists = build_networks(architecture, activation, weight_bound, rng)?;
        Ok(Self::new(NearestNeighbour::new(training), specialists))
    }

    /// The standard pair of specialists, `[input_size, 24, 6]` each, for digits
    /// {0, 1, 3, 6, 9} and {2, 4, 5, 7, 8}.
    ///
    /// # Example
    ///
    /// ```
    /// use digit_ensemble::ensemble::Ensemble;
    /// use digit_ensemble::network::DEFAULT_WEIGHT_BOUND;
    /// use digit_ensemble::utils::{Activation, SimpleRng};
    ///
    /// let mut rng = SimpleRng::new(7);
    /// let ensemble = Ensemble::split_digits(
    ///     Vec::new(),
    ///     64,
    ///     Activation::sigmoid(),
    ///     DEFAULT_WEIGHT_BOUND,
    ///     &mut rng,
    /// )
    /// .unwrap();
    /// assert_eq!(ensemble.specialists().len(), 2);
    /// ```
    pub fn split_digits(
        training: Vec<Sample>,
        input_size: usize,
        activation: Activation,
        weight_bound: f64,
        rng: &mut SimpleRng,
    ) -> Result<Self, Box<dyn Error>> {
        Self::from_architecture(
            training,
            &ArchitectureConfig::split_digits(input_size),
            activation,
            weight_bound,
            rng,
        )
    }

    pub fn knn(&self) -> &NearestNeighbour {
        &self.knn
    }

    pub fn specialists(&self) -> &[Network] {
        &self.specialists
    }

    /// Input width of the specialists, if there are any.
    pub fn input_size(&self) -> Option<usize> {
        self.specialists.first().map(Network::input_size)
    }

    /// Trains every specialist on `data`, one worker task per network.
    ///
    /// Each task builds its own [`Trainer`] and scheduler from `config`; the
    /// data set is only read. Returns once all tasks have finished, with the
    /// epoch history of every specialist in order.
    pub fn train(&mut self, data: &[Sample], config: &TrainingConfig) -> Vec<Vec<EpochStats>> {
        info!(
            "Training {} specialists on {} samples",
            self.specialists.len(),
            data.len()
        );
        let start = Instant::now();

        let histories: Vec<Vec<EpochStats>> = self
            .specialists
            .par_iter_mut()
            .map(|network| Trainer::from_config(network, data, config).train())
            .collect();

        info!(
            "All specialists trained in {:.2}s",
            start.elapsed().as_secs_f64()
        );
        histories
    }
}

impl Classifier for Ensemble {
    /// Arg-max of the summed scores, the lowest digit winning ties.
    fn classify(&self, features: &[f64]) -> u8 {
        arg_max(&self.estimate(features)) as u8
    }

    /// Nearest-neighbour scores plus the scores of every specialist.
    fn estimate(&self, features: &[f64]) -> Scores {
        let mut scores = self.knn.estimate(features);
        for network in &self.specialists {
            add_scores(&mut scores, &network.estimate(features));
        }
        scores
    }
}
