//! Layer abstractions for neural networks
//!
//! Only fully connected layers are provided; a network is an ordered stack of
//! them.

pub mod dense;

pub use dense::DenseLayer;
