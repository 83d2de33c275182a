//! Activation functions for neural networks
//!
//! Every activation here pairs a squashing function with its derivative
//! expressed in terms of the *activated output*. Backpropagation only ever has
//! the cached outputs at hand, so only functions whose derivative can be
//! recovered from their own output are supported:
//! - Sigmoid: `y = 1 / (1 + e^-x)`, `dy = y * (1 - y)`
//! - Tanh: `y = tanh(x)`, `dy = 1 - y^2`

use std::fmt;

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative assuming x = sigmoid(z).
///
/// Returns the derivative: x * (1 - x)
pub fn sigmoid_derivative(x: f64) -> f64 {
    x * (1.0 - x)
}

/// Hyperbolic tangent activation function.
pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

/// Tanh derivative assuming x = tanh(z).
///
/// Returns the derivative: 1 - x^2
pub fn tanh_derivative(x: f64) -> f64 {
    1.0 - x * x
}

/// A (function, derivative-from-output) pair applied elementwise.
///
/// The value is `Copy` and carries no state, so it is handed to every layer
/// and trainer explicitly at construction time instead of living in a global.
///
/// # Example
///
/// ```
/// use digit_ensemble::utils::activations::Activation;
///
/// let sigmoid = Activation::sigmoid();
/// let y = sigmoid.squash(0.0);
/// assert_eq!(y, 0.5);
/// assert_eq!(sigmoid.derivative(y), 0.25);
/// ```
#[derive(Clone, Copy)]
pub struct Activation {
    name: &'static str,
    function: fn(f64) -> f64,
    derivative: fn(f64) -> f64,
}

impl Activation {
    /// Logistic sigmoid, the default for every network.
    pub fn sigmoid() -> Self {
        Self {
            name: "sigmoid",
            function: sigmoid,
            derivative: sigmoid_derivative,
        }
    }

    /// Hyperbolic tangent.
    pub fn tanh() -> Self {
        Self {
            name: "tanh",
            function: tanh,
            derivative: tanh_derivative,
        }
    }

    /// Looks an activation up by its configuration name.
    ///
    /// Returns `None` for names that are not supported.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sigmoid" => Some(Self::sigmoid()),
            "tanh" => Some(Self::tanh()),
            _ => None,
        }
    }

    /// Configuration name of this activation.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Applies the nonlinearity to a net value.
    #[inline]
    pub fn squash(&self, net: f64) -> f64 {
        (self.function)(net)
    }

    /// Derivative of the nonlinearity given its own output.
    #[inline]
    pub fn derivative(&self, output: f64) -> f64 {
        (self.derivative)(output)
    }
}

impl Default for Activation {
    fn default() -> Self {
        Self::sigmoid()
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Activation").field(&self.name).finish()
    }
}

impl PartialEq for Activation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_sigmoid_zero() {
        let result = sigmoid(0.0);
        assert!((result - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_sigmoid_positive() {
        let result = sigmoid(2.0);
        assert!(result > 0.5 && result < 1.0);
    }

    #[test]
    fn test_sigmoid_negative() {
        let result = sigmoid(-2.0);
        assert!(result > 0.0 && result < 0.5);
    }

    #[test]
    fn test_sigmoid_derivative_at_half() {
        let result = sigmoid_derivative(0.5);
        assert!((result - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_tanh_derivative_at_zero() {
        assert!((tanh_derivative(tanh(0.0)) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Activation::from_name("sigmoid"), Some(Activation::sigmoid()));
        assert_eq!(Activation::from_name("TANH"), Some(Activation::tanh()));
        assert!(Activation::from_name("relu").is_none());
    }

    #[test]
    fn test_derivative_matches_numerical() {
        let h = 1e-6;
        for activation in [Activation::sigmoid(), Activation::tanh()] {
            for &x in &[-2.0, -0.5, 0.0, 0.7, 3.0] {
                let numerical =
                    (activation.squash(x + h) - activation.squash(x - h)) / (2.0 * h);
                let analytical = activation.derivative(activation.squash(x));
                assert!(
                    (numerical - analytical).abs() < 1e-6,
                    "{} derivative mismatch at {}",
                    activation.name(),
                    x
                );
            }
        }
    }
}
