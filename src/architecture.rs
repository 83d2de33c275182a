//! Architecture configuration structures
//!
//! This module describes the set of networks an ensemble is built from, via
//! JSON configuration files. This enables architecture experimentation without
//! code changes.

use crate::mapping::{ClassMapping, MappingError, CLASS_COUNT};
use crate::network::Network;
use crate::utils::{Activation, SimpleRng};
use serde::Deserialize;
use std::error::Error;
use std::fs;

/// Hidden width of the standard specialists.
pub const SPECIALIST_HIDDEN: usize = 24;

/// Digits recognised by the first standard specialist.
pub const ROUND_DIGITS: [u8; 5] = [0, 1, 3, 6, 9];

/// Digits recognised by the second standard specialist.
pub const ANGULAR_DIGITS: [u8; 5] = [2, 4, 5, 7, 8];

/// Configuration for a single network.
///
/// - `widths`: blueprint, input width first, output width last
/// - `classes`: digits the network specialises in. When omitted the network
///   covers every digit and needs 10 outputs; otherwise it needs one output per
///   listed digit plus an abstain neuron.
///
/// # Examples
///
/// ```json
/// { "widths": [64, 24, 6], "classes": [0, 1, 3, 6, 9] }
/// ```
///
/// ```json
/// { "widths": [64, 32, 10] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkConfig {
    pub widths: Vec<usize>,
    pub classes: Option<Vec<u8>>,
}

impl NetworkConfig {
    pub fn mapping(&self) -> Result<ClassMapping, MappingError> {
        match &self.classes {
            Some(classes) => ClassMapping::specialist(classes),
            None => Ok(ClassMapping::identity()),
        }
    }

    fn expected_outputs(&self) -> usize {
        self.classes
            .as_ref()
            .map_or(CLASS_COUNT, |classes| classes.len() + 1)
    }
}

/// Configuration for every network of an ensemble.
///
/// # Example
///
/// ```json
/// {
///   "networks": [
///     { "widths": [64, 24, 6], "classes": [0, 1, 3, 6, 9] },
///     { "widths": [64, 24, 6], "classes": [2, 4, 5, 7, 8] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArchitectureConfig {
    pub networks: Vec<NetworkConfig>,
}

impl ArchitectureConfig {
    /// Two specialists splitting the digits into round and angular shapes.
    pub fn split_digits(input_size: usize) -> Self {
        let specialist = |classes: &[u8]| NetworkConfig {
            widths: vec![input_size, SPECIALIST_HIDDEN, classes.len() + 1],
            classes: Some(classes.to_vec()),
        };
        Self {
            networks: vec![specialist(&ROUND_DIGITS), specialist(&ANGULAR_DIGITS)],
        }
    }

    /// Input width shared by every network.
    pub fn input_size(&self) -> Option<usize> {
        self.networks
            .first()
            .and_then(|network| network.widths.first().copied())
    }
}

/// Loads an architecture configuration from a JSON file.
///
/// Reads the file at `path` and deserializes its JSON contents into an `ArchitectureConfig`.
/// Performs validation on the configuration structure.
///
/// # Examples
///
/// ```no_run
/// use digit_ensemble::architecture::load_architecture;
///
/// let arch = load_architecture("config/architectures/split_digits.json").unwrap();
/// assert!(!arch.networks.is_empty());
/// ```
pub fn load_architecture(path: &str) -> Result<ArchitectureConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)?;
    validate_architecture(&config)?;
    Ok(config)
}

fn invalid(message: String) -> Box<dyn Error> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// Validates an architecture configuration.
///
/// Checks that:
/// - There is at least one network
/// - Each network has a usable blueprint and class list
/// - The output width matches the class list
/// - Every network shares the same input width
///
/// # Errors
///
/// Returns an error if validation fails with a descriptive message.
pub fn validate_architecture(config: &ArchitectureConfig) -> Result<(), Box<dyn Error>> {
    if config.networks.is_empty() {
        return Err(invalid(
            "Architecture must have at least one network".to_string(),
        ));
    }

    for (i, network) in config.networks.iter().enumerate() {
        validate_network(network, i)?;
    }

    let input_size = config.input_size();
    for (i, network) in config.networks.iter().enumerate() {
        if network.widths.first().copied() != input_size {
            return Err(invalid(format!(
                "Network {} input width {:?} differs from network 0 input width {:?}",
                i,
                network.widths.first(),
                input_size
            )));
        }
    }

    Ok(())
}

fn validate_network(network: &NetworkConfig, index: usize) -> Result<(), Box<dyn Error>> {
    if network.widths.len() < 2 {
        return Err(invalid(format!(
            "Network {} needs an input width and at least one layer",
            index
        )));
    }

    if network.widths.contains(&0) {
        return Err(invalid(format!(
            "Network {} has a zero-width layer",
            index
        )));
    }

    if let Err(err) = network.mapping() {
        return Err(invalid(format!("Network {}: {}", index, err)));
    }

    let outputs = network.widths[network.widths.len() - 1];
    let expected = network.expected_outputs();
    if outputs != expected {
        return Err(invalid(format!(
            "Network {} has {} outputs but its classes need {}",
            index, outputs, expected
        )));
    }

    Ok(())
}

/// Builds untrained networks from an architecture configuration.
///
/// # Errors
///
/// Returns an error if the configuration fails validation.
pub fn build_networks(
    config: &ArchitectureConfig,
    activation: Activation,
    weight_bound: f64,
    rng: &mut SimpleRng,
) -> Result<Vec<Network>, Box<dyn Error>> {
    validate_architecture(config)?;

    config
        .networks
        .iter()
        .map(|network| -> Result<Network, Box<dyn Error>> {
            Ok(Network::from_blueprint(
                &network.widths,
                network.mapping()?,
                activation,
                weight_bound,
                rng,
            ))
        })
        .collect()
}
