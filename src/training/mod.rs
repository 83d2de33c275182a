//! Backpropagation training.
//!
//! - `trainer`: epoch/sample loop, backpropagation and batch commits
//! - `nudges`: the gradient accumulator owned by a trainer

pub mod nudges;
pub mod trainer;

pub use nudges::Nudges;
pub use trainer::{EpochStats, Trainer};
