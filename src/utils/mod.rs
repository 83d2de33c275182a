//! Shared utilities for the classifiers
//!
//! This module provides random number generation, activation functions,
//! learning rate schedules and pixel-filter preprocessing.

pub mod activations;
pub mod filters;
pub mod lr_scheduler;
pub mod rng;

pub use activations::Activation;
pub use filters::Filters;
pub use lr_scheduler::{ConstantLR, CyclicalLR, LRScheduler};
pub use rng::SimpleRng;
