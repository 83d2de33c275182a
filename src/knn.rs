//! Nearest-neighbour classifier over a labelled training set.

use crate::classifier::{Classifier, Scores};
use crate::dataset::Sample;
use crate::mapping::CLASS_COUNT;

/// Squared Euclidean distance between two feature vectors.
///
/// # Panics
///
/// Panics if the vectors differ in length.
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "feature length mismatch in squared_distance");
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Labels a sample after the closest training sample.
///
/// Every query is a linear scan over the stored samples.
#[derive(Debug, Clone, Default)]
pub struct NearestNeighbour {
    samples: Vec<Sample>,
}

impl NearestNeighbour {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Closest training sample, the first one seen winning ties.
    pub fn nearest(&self, features: &[f64]) -> Option<&Sample> {
        let mut best: Option<(&Sample, f64)> = None;
        for sample in &self.samples {
            let distance = squared_distance(&sample.features, features);
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((sample, distance));
            }
        }
        best.map(|(sample, _)| sample)
    }
}

impl Classifier for NearestNeighbour {
    /// Label of the nearest training sample, or 0 for an empty training set.
    fn classify(&self, features: &[f64]) -> u8 {
        self.nearest(features).map_or(0, |sample| sample.label)
    }

    /// Relative closeness of every class.
    ///
    /// Distances to all training samples are summed per class, each sum
    /// starting at 1. The smallest sum divided by a class's sum gives that
    /// class's score, so the closest class scores 1 and the others fall in
    /// (0, 1].
    fn estimate(&self, features: &[f64]) -> Scores {
        let mut sums = [1.0; CLASS_COUNT];
        for sample in &self.samples {
            sums[sample.label as usize] += squared_distance(&sample.features, features);
        }

        let min = sums.iter().copied().fold(f64::INFINITY, f64::min);
        let mut scores = [0.0; CLASS_COUNT];
        for (score, sum) in scores.iter_mut().zip(&sums) {
            *score = min / sum;
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn knn() -> NearestNeighbour {
        NearestNeighbour::new(vec![
            Sample::new(vec![0.0, 0.0], 3),
            Sample::new(vec![4.0, 4.0], 8),
            Sample::new(vec![0.0, 0.0], 5),
        ])
    }

    #[test]
    fn test_squared_distance() {
        assert_eq!(squared_distance(&[1.0, 2.0], &[4.0, 6.0]), 25.0);
    }

    #[test]
    fn test_classify_nearest_label() {
        let knn = knn();
        assert_eq!(knn.classify(&[3.5, 3.0]), 8);
    }

    #[test]
    fn test_classify_tie_keeps_first_sample() {
        assert_eq!(knn().classify(&[0.0, 0.0]), 3);
    }

    #[test]
    fn test_empty_classifier() {
        let knn = NearestNeighbour::default();
        assert!(knn.is_empty());
        assert_eq!(knn.classify(&[1.0]), 0);
        assert_eq!(knn.estimate(&[1.0]), [1.0; CLASS_COUNT]);
    }

    #[test]
    fn test_estimate_scores() {
        let knn = knn();
        let scores = knn.estimate(&[0.0, 0.0]);

        // Sums: class 3 = 1, class 5 = 1, class 8 = 1 + 32, every other class = 1.
        assert_relative_eq!(scores[3], 1.0);
        assert_relative_eq!(scores[8], 1.0 / 33.0);
        assert_relative_eq!(scores[0], 1.0);
        assert!(scores.iter().all(|&s| s > 0.0 && s <= 1.0));
    }
}
