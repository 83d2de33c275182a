//! Accuracy reports for trained classifiers.

use crate::classifier::Classifier;
use crate::dataset::Sample;
use crate::mapping::CLASS_COUNT;
use log::info;
use std::fmt;

/// How many samples of a labelled set a classifier got right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub title: String,
    pub correct: usize,
    pub total: usize,
}

impl Assessment {
    /// Percentage of correctly classified samples; 0 for an empty set.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "> {}\nCorrectly classified {} out of {} ({:.2} %).",
            self.title.to_uppercase(),
            self.correct,
            self.total,
            self.accuracy()
        )
    }
}

/// Classifies every sample and counts the hits.
///
/// # Example
///
/// ```
/// use digit_ensemble::dataset::Sample;
/// use digit_ensemble::knn::NearestNeighbour;
/// use digit_ensemble::report::assess;
///
/// let training = vec![Sample::new(vec![0.0], 1), Sample::new(vec![5.0], 7)];
/// let validation = vec![Sample::new(vec![0.5], 1), Sample::new(vec![1.0], 7)];
///
/// let report = assess("knn", &NearestNeighbour::new(training), &validation);
/// assert_eq!(report.correct, 1);
/// assert_eq!(report.accuracy(), 50.0);
/// ```
pub fn assess<C: Classifier + ?Sized>(
    title: &str,
    classifier: &C,
    samples: &[Sample],
) -> Assessment {
    let correct = samples
        .iter()
        .filter(|sample| classifier.classify(&sample.features) == sample.label)
        .count();

    let assessment = Assessment {
        title: title.to_string(),
        correct,
        total: samples.len(),
    };
    info!(
        "{}: {}/{} correct ({:.2}%)",
        assessment.title,
        assessment.correct,
        assessment.total,
        assessment.accuracy()
    );
    assessment
}

/// Counts of actual class (rows) against predicted class (columns).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    counts: [[usize; CLASS_COUNT]; CLASS_COUNT],
}

impl ConfusionMatrix {
    pub fn build<C: Classifier + ?Sized>(classifier: &C, samples: &[Sample]) -> Self {
        let mut matrix = Self::default();
        for sample in samples {
            let predicted = classifier.classify(&sample.features);
            matrix.record(sample.label, predicted);
        }
        matrix
    }

    pub fn record(&mut self, actual: u8, predicted: u8) {
        self.counts[actual as usize][predicted as usize] += 1;
    }

    pub fn count(&self, actual: u8, predicted: u8) -> usize {
        self.counts[actual as usize][predicted as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..CLASS_COUNT).map(|class| self.counts[class][class]).sum()
    }

    /// Percentage on the diagonal; 0 when nothing was recorded.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.correct() as f64 / total as f64 * 100.0
        }
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actual\\pred")?;
        for predicted in 0..CLASS_COUNT {
            write!(f, "{:>6}", predicted)?;
        }
        writeln!(f)?;

        for (actual, row) in self.counts.iter().enumerate() {
            write!(f, "{:>11}", actual)?;
            for count in row {
                write!(f, "{:>6}", count)?;
            }
            writeln!(f)?;
        }
        write!(f, "accuracy: {:.2} %", self.accuracy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Scores;

    /// Always answers the same digit.
    struct Constant(u8);

    impl Classifier for Constant {
        fn classify(&self, _features: &[f64]) -> u8 {
            self.0
        }

        fn estimate(&self, _features: &[f64]) -> Scores {
            let mut scores = [0.0; CLASS_COUNT];
            scores[self.0 as usize] = 1.0;
            scores
        }
    }

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new(vec![0.0], 3),
            Sample::new(vec![0.0], 3),
            Sample::new(vec![0.0], 5),
            Sample::new(vec![0.0], 9),
        ]
    }

    #[test]
    fn test_assess_counts_hits() {
        let report = assess("constant", &Constant(3), &samples());
        assert_eq!(report.correct, 2);
        assert_eq!(report.total, 4);
        assert_eq!(report.accuracy(), 50.0);
    }

    #[test]
    fn test_assess_empty_set() {
        let report = assess("empty", &Constant(3), &[]);
        assert_eq!(report.accuracy(), 0.0);
    }

    #[test]
    fn test_assessment_display() {
        let report = assess("knn", &Constant(3), &samples());
        assert_eq!(
            report.to_string(),
            "> KNN\nCorrectly classified 2 out of 4 (50.00 %)."
        );
    }

    #[test]
    fn test_confusion_matrix() {
        let matrix = ConfusionMatrix::build(&Constant(5), &samples());
        assert_eq!(matrix.count(3, 5), 2);
        assert_eq!(matrix.count(5, 5), 1);
        assert_eq!(matrix.count(3, 3), 0);
        assert_eq!(matrix.total(), 4);
        assert_eq!(matrix.accuracy(), 25.0);
        assert_eq!(matrix.to_string().lines().count(), CLASS_COUNT + 2);
    }
}
