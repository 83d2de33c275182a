//! The contract shared by every digit classifier.

use crate::mapping::CLASS_COUNT;

/// One score per digit class; higher means more confident.
pub type Scores = [f64; CLASS_COUNT];

/// Anything that can label a feature vector with a digit.
///
/// Scores from different classifiers are meant to be summed, so they are not
/// required to be normalised.
pub trait Classifier {
    /// Predicted digit in 0..=9.
    fn classify(&self, features: &[f64]) -> u8;

    /// Per-class confidence scores.
    fn estimate(&self, features: &[f64]) -> Scores;
}

/// Index of the largest value; the first index wins ties.
///
/// Returns 0 for an empty slice.
pub fn arg_max(values: &[f64]) -> usize {
    let mut candidate = 0;
    for (index, &value) in values.iter().enumerate().skip(1) {
        if value > values[candidate] {
            candidate = index;
        }
    }
    candidate
}

/// Adds `other` into `base` elementwise.
pub fn add_scores(base: &mut Scores, other: &Scores) {
    for (total, value) in base.iter_mut().zip(other) {
        *total += value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_max_first_wins_ties() {
        assert_eq!(arg_max(&[0.1, 0.9, 0.9, 0.3]), 1);
        assert_eq!(arg_max(&[0.5, 0.5]), 0);
    }

    #[test]
    fn test_arg_max_empty() {
        assert_eq!(arg_max(&[]), 0);
    }

    #[test]
    fn test_add_scores() {
        let mut base = [1.0; CLASS_COUNT];
        let mut other = [0.0; CLASS_COUNT];
        other[3] = 2.5;
        add_scores(&mut base, &other);
        assert_eq!(base[3], 3.5);
        assert_eq!(base[0], 1.0);
    }
}
