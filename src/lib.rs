//! Handwritten Digit Ensemble Library
//!
//! This library provides a feed-forward neural network trained by
//! backpropagation with a cyclical learning rate and mini-batch commits, a
//! nearest-neighbour classifier, and an ensemble that sums the scores of
//! specialist networks with the nearest-neighbour scores.
//!
//! # Modules
//!
//! - `layers`: Fully connected layer
//! - `network`: Layer stack with its output class mapping
//! - `mapping`: Output neuron to digit mapping, including abstain neurons
//! - `training`: Backpropagation trainer and gradient accumulator
//! - `classifier`: Contract shared by every classifier
//! - `knn`: Nearest-neighbour classifier
//! - `ensemble`: Score-summing combiner and parallel specialist training
//! - `dataset`: Sample loading and the training/validation split
//! - `report`: Accuracy and confusion matrix reports
//! - `utils`: Shared utilities (RNG, activation functions, schedules, filters)
//! - `config`: Training configuration structures
//! - `architecture`: Architecture configuration and network building

pub mod architecture;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod ensemble;
pub mod knn;
pub mod layers;
pub mod mapping;
pub mod network;
pub mod report;
pub mod training;
pub mod utils;
