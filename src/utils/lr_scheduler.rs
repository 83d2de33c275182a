//! Learning rate scheduler trait and implementations
//!
//! This module defines the LRScheduler trait for adjusting learning rates during training.
//! The learning rate is epoch-scoped: the trainer reads it once before the first
//! sample of an epoch and advances the scheduler after the last one.

/// Core trait for learning rate schedulers.
///
/// Schedulers adjust the learning rate during training based on the current epoch.
///
/// # Example
///
/// ```ignore
/// let mut scheduler = CyclicalLR::new(0.6, 0.4, 4, 5);
///
/// for _ in 0..scheduler.iterations() {
///     let lr = scheduler.get_lr();
///     // ... train one epoch with lr ...
///     scheduler.step();
/// }
///
/// scheduler.reset();
/// ```
pub trait LRScheduler {
    /// Get the learning rate for the current epoch.
    fn get_lr(&self) -> f64;

    /// Advance the scheduler to the next epoch.
    ///
    /// Call this method once per epoch, after the epoch's last sample.
    fn step(&mut self);

    /// Reset the scheduler to its initial state (epoch 0).
    fn reset(&mut self);
}

/// Constant learning rate, useful for tests and short fine-tuning runs.
#[derive(Debug, Clone)]
pub struct ConstantLR {
    learning_rate: f64,
}

impl ConstantLR {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl LRScheduler for ConstantLR {
    fn get_lr(&self) -> f64 {
        self.learning_rate
    }

    fn step(&mut self) {}

    fn reset(&mut self) {}
}

/// Triangular cyclical learning rate with linear decay.
///
/// The raw rate oscillates between `mean_lr - oscillation` and
/// `mean_lr + oscillation` with a period of `2 * step_size` epochs, starting at
/// the maximum. The raw rate is then scaled by
/// `(iterations - epoch + 1) / iterations`, so it decays linearly toward zero
/// across the run.
///
/// The number of epochs is fixed up front as
/// `cycles * 2 * step_size + step_size + 1`. With that count the final epoch
/// always lands on a trough of the triangle, so training finishes with the
/// learning rate at its smallest.
///
/// # Fields
///
/// * `max_lr` - Upper bound of the triangle (`mean_lr + oscillation`)
/// * `min_lr` - Lower bound of the triangle (`mean_lr - oscillation`)
/// * `step_size` - Half period, in epochs
/// * `iterations` - Total number of epochs in the run
/// * `current_epoch` - Current training epoch (0-indexed)
///
/// # Example
///
/// ```
/// use digit_ensemble::utils::lr_scheduler::{CyclicalLR, LRScheduler};
///
/// let scheduler = CyclicalLR::new(0.5, 0.25, 2, 3);
/// assert_eq!(scheduler.iterations(), 15);
/// // Epoch 0 starts on the crest, scaled by (15 + 1) / 15.
/// assert!((scheduler.get_lr() - 0.75 * 16.0 / 15.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CyclicalLR {
    max_lr: f64,
    min_lr: f64,
    step_size: usize,
    iterations: usize,
    current_epoch: usize,
}

impl CyclicalLR {
    /// Creates a new cyclical scheduler.
    ///
    /// # Arguments
    ///
    /// * `mean_lr` - Centre of the oscillation
    /// * `oscillation` - Amplitude of the oscillation (should not exceed `mean_lr`)
    /// * `step_size` - Epochs from crest to trough (must be > 0)
    /// * `cycles` - Number of full crest-to-crest cycles before the final descent
    ///
    /// # Panics
    ///
    /// Panics if `step_size` is zero.
    pub fn new(mean_lr: f64, oscillation: f64, step_size: usize, cycles: usize) -> Self {
        assert!(step_size > 0, "step_size must be positive");
        Self {
            max_lr: mean_lr + oscillation,
            min_lr: mean_lr - oscillation,
            step_size,
            iterations: Self::iterations_for(step_size, cycles),
            current_epoch: 0,
        }
    }

    /// Number of epochs a run with these parameters lasts.
    pub fn iterations_for(step_size: usize, cycles: usize) -> usize {
        cycles * (step_size * 2) + step_size + 1
    }

    /// Total number of epochs in the run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn max_lr(&self) -> f64 {
        self.max_lr
    }

    pub fn min_lr(&self) -> f64 {
        self.min_lr
    }

    /// Triangle value for `epoch` before the decay factor is applied.
    ///
    /// Always within `[min_lr, max_lr]` for a non-negative `min_lr`.
    pub fn cyclical_rate(&self, epoch: usize) -> f64 {
        let step = 1.0 + epoch as f64 / (2.0 * self.step_size as f64);
        let cycle = step.floor();
        // Distance from the middle of the current cycle, in [0, 0.5].
        let progress = (0.5 - (step - cycle)).abs();

        (self.max_lr - 2.0 * (self.max_lr - self.min_lr) * (0.5 - progress)).abs()
    }

    /// Learning rate for `epoch`, including the linear decay.
    pub fn rate_at(&self, epoch: usize) -> f64 {
        let iterations = self.iterations as f64;
        self.cyclical_rate(epoch) * (iterations - epoch as f64 + 1.0) / iterations
    }
}

impl LRScheduler for CyclicalLR {
    fn get_lr(&self) -> f64 {
        self.rate_at(self.current_epoch)
    }

    fn step(&mut self) {
        self.current_epoch += 1;
    }

    fn reset(&mut self) {
        self.current_epoch = 0;
    }
}
