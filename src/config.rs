//! Configuration structures for training
//!
//! This module provides the training configuration: learning rate schedule,
//! batch size, activation function and weight initialisation range.

use crate::network::DEFAULT_WEIGHT_BOUND;
use crate::utils::{Activation, ConstantLR, CyclicalLR, LRScheduler};
use serde::Deserialize;
use std::error::Error;
use std::fs;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MEAN_LEARNING_RATE: f64 = 0.6;
pub const DEFAULT_OSCILLATION: f64 = 0.4;
pub const DEFAULT_STEP_SIZE: usize = 4;
pub const DEFAULT_CYCLES: usize = 5;

/// Configuration for training, parsed from JSON files.
///
/// Different scheduler types require different optional fields:
///
/// - **cyclical**: Requires `mean_learning_rate`, `oscillation`, `step_size` and `cycles`.
///   The number of epochs follows from `step_size` and `cycles`.
/// - **constant**: Requires `learning_rate` and `epochs`
///
/// Optional for both:
///
/// - `batch_size` (default 10)
/// - `activation_function`: "sigmoid" (default) or "tanh"
/// - `weight_bound`: half-width of the initial weight range (default 0.25)
///
/// # Example
///
/// ```json
/// {
///   "scheduler_type": "cyclical",
///   "mean_learning_rate": 0.6,
///   "oscillation": 0.4,
///   "step_size": 4,
///   "cycles": 5,
///   "batch_size": 10
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingConfig {
    /// Type of learning rate scheduler: "cyclical" or "constant"
    pub scheduler_type: String,

    /// Centre of the cyclical schedule
    pub mean_learning_rate: Option<f64>,

    /// Amplitude of the cyclical schedule
    pub oscillation: Option<f64>,

    /// Epochs from crest to trough of the cyclical schedule
    pub step_size: Option<usize>,

    /// Full cycles of the cyclical schedule
    pub cycles: Option<usize>,

    /// Fixed rate for the constant schedule
    pub learning_rate: Option<f64>,

    /// Epoch count for the constant schedule
    pub epochs: Option<usize>,

    /// Samples per committed mini-batch
    pub batch_size: Option<usize>,

    /// Activation function type: "sigmoid" or "tanh"
    pub activation_function: Option<String>,

    /// Initial weights are drawn from [-weight_bound, weight_bound)
    pub weight_bound: Option<f64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            scheduler_type: "cyclical".to_string(),
            mean_learning_rate: Some(DEFAULT_MEAN_LEARNING_RATE),
            oscillation: Some(DEFAULT_OSCILLATION),
            step_size: Some(DEFAULT_STEP_SIZE),
            cycles: Some(DEFAULT_CYCLES),
            learning_rate: None,
            epochs: None,
            batch_size: Some(DEFAULT_BATCH_SIZE),
            activation_function: None,
            weight_bound: None,
        }
    }
}

impl TrainingConfig {
    /// Fresh scheduler at epoch 0.
    pub fn scheduler(&self) -> Box<dyn LRScheduler + Send> {
        if self.is_constant() {
            Box::new(ConstantLR::new(self.learning_rate.unwrap_or(DEFAULT_MEAN_LEARNING_RATE)))
        } else {
            Box::new(self.cyclical())
        }
    }

    /// Number of epochs a training run lasts.
    pub fn epochs(&self) -> usize {
        if self.is_constant() {
            self.epochs.unwrap_or(0)
        } else {
            self.cyclical().iterations()
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    pub fn activation(&self) -> Activation {
        self.activation_function
            .as_deref()
            .and_then(Activation::from_name)
            .unwrap_or_default()
    }

    pub fn weight_bound(&self) -> f64 {
        self.weight_bound.unwrap_or(DEFAULT_WEIGHT_BOUND)
    }

    fn is_constant(&self) -> bool {
        self.scheduler_type.eq_ignore_ascii_case("constant")
    }

    fn cyclical(&self) -> CyclicalLR {
        CyclicalLR::new(
            self.mean_learning_rate.unwrap_or(DEFAULT_MEAN_LEARNING_RATE),
            self.oscillation.unwrap_or(DEFAULT_OSCILLATION),
            self.step_size.unwrap_or(DEFAULT_STEP_SIZE).max(1),
            self.cycles.unwrap_or(DEFAULT_CYCLES),
        )
    }
}

/// Loads a training configuration from a JSON file.
///
/// Reads the file at `path` and deserializes its JSON contents into a `TrainingConfig`.
///
/// # Returns
///
/// `Ok(TrainingConfig)` on success, or an error if the file cannot be read, the JSON is
/// invalid, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use digit_ensemble::config::load_config;
///
/// let cfg = load_config("config/training_cyclical.json").unwrap();
/// assert_eq!(cfg.scheduler_type, "cyclical");
/// ```
pub fn load_config(path: &str) -> Result<TrainingConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses and validates a configuration from a JSON string.
pub fn parse_config(contents: &str) -> Result<TrainingConfig, Box<dyn Error>> {
    let config: TrainingConfig = serde_json::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

fn invalid(message: impl Into<String>) -> Box<dyn Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message.into(),
    ))
}

/// Validates a training configuration.
///
/// Checks that:
/// - The scheduler type is known and its required fields are present
/// - Rates are non-negative and the oscillation does not exceed the mean rate
/// - Step size, cycles-derived epoch count, epochs and batch size are positive
/// - The activation function is supported and the weight bound is positive
pub fn validate_config(config: &TrainingConfig) -> Result<(), Box<dyn Error>> {
    match config.scheduler_type.to_lowercase().as_str() {
        "cyclical" => {
            let mean = config
                .mean_learning_rate
                .ok_or_else(|| invalid("cyclical scheduler missing mean_learning_rate"))?;
            let oscillation = config
                .oscillation
                .ok_or_else(|| invalid("cyclical scheduler missing oscillation"))?;
            let step_size = config
                .step_size
                .ok_or_else(|| invalid("cyclical scheduler missing step_size"))?;
            config
                .cycles
                .ok_or_else(|| invalid("cyclical scheduler missing cycles"))?;

            if mean < 0.0 {
                return Err(invalid("mean_learning_rate must be non-negative"));
            }
            if oscillation < 0.0 {
                return Err(invalid("oscillation must be non-negative"));
            }
            if oscillation > mean {
                return Err(invalid("oscillation must not exceed mean_learning_rate"));
            }
            if step_size == 0 {
                return Err(invalid("step_size must be positive"));
            }
        }
        "constant" => {
            let learning_rate = config
                .learning_rate
                .ok_or_else(|| invalid("constant scheduler missing learning_rate"))?;
            let epochs = config
                .epochs
                .ok_or_else(|| invalid("constant scheduler missing epochs"))?;

            if learning_rate < 0.0 {
                return Err(invalid("learning_rate must be non-negative"));
            }
            if epochs == 0 {
                return Err(invalid("epochs must be positive"));
            }
        }
        other => {
            return Err(invalid(format!(
                "Invalid scheduler type '{}'. Must be one of: cyclical, constant",
                other
            )))
        }
    }

    if config.batch_size == Some(0) {
        return Err(invalid("batch_size must be positive"));
    }

    if let Some(ref activation) = config.activation_function {
        if Activation::from_name(activation).is_none() {
            return Err(invalid(format!(
                "Invalid activation function '{}'. Must be one of: sigmoid, tanh",
                activation
            )));
        }
    }

    if let Some(bound) = config.weight_bound {
        if bound <= 0.0 {
            return Err(invalid("weight_bound must be positive"));
        }
    }

    Ok(())
}
