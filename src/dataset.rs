//! Labelled digit samples and the positional training/validation split.
//!
//! The on-disk format is one sample per line: comma-separated feature values
//! followed by the integer class label, e.g. `0,1,6,15,...,0,7`.

use crate::mapping::CLASS_COUNT;
use crate::utils::Filters;
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Fixed-length feature vector plus its digit label.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: u8,
}

impl Sample {
    /// # Panics
    ///
    /// Panics if `label` is not a digit.
    pub fn new(features: Vec<f64>, label: u8) -> Self {
        assert!(
            (label as usize) < CLASS_COUNT,
            "label {} is not a digit",
            label
        );
        Self { features, label }
    }
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not read data set: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: `{value}` is not a number")]
    Parse { line: usize, value: String },
    #[error("line {line}: label `{value}` is not a digit")]
    Label { line: usize, value: String },
    #[error("line {line}: expected {expected} features, found {found}")]
    Width {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {found} pixels do not form a square image")]
    NotSquare { line: usize, found: usize },
    #[error("data set is empty")]
    Empty,
    #[error("split factor {0} is invalid (use -1, 0 or a value of at least 2)")]
    SplitFactor(i32),
}

/// How a loaded file is divided between training and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    /// The first `(factor - 1) / factor` of the samples train, the rest validate.
    CrossFold(usize),
    TrainingOnly,
    ValidationOnly,
}

impl Split {
    /// Decodes a split factor: `-1` trains on everything, `0` validates on
    /// everything, `f >= 2` splits `f - 1 : 1`.
    pub fn from_factor(factor: i32) -> Result<Self, DataError> {
        match factor {
            -1 => Ok(Self::TrainingOnly),
            0 => Ok(Self::ValidationOnly),
            f if f >= 2 => Ok(Self::CrossFold(f as usize)),
            f => Err(DataError::SplitFactor(f)),
        }
    }

    /// Index of the first validation sample.
    fn boundary(&self, len: usize) -> usize {
        match *self {
            Self::TrainingOnly => len,
            Self::ValidationOnly => 0,
            Self::CrossFold(factor) => len / factor * (factor - 1),
        }
    }
}

/// Samples divided into a contiguous, unshuffled training and validation part.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub training: Vec<Sample>,
    pub validation: Vec<Sample>,
}

impl DataSet {
    pub fn from_samples(mut samples: Vec<Sample>, split: Split) -> Self {
        let validation = samples.split_off(split.boundary(samples.len()));
        Self {
            training: samples,
            validation,
        }
    }

    /// Loads and splits a data file, optionally expanding every sample with
    /// pixel filters.
    ///
    /// Any malformed line aborts the load.
    pub fn from_path(
        path: impl AsRef<Path>,
        split: Split,
        filters: Option<&Filters>,
    ) -> Result<Self, DataError> {
        let file = File::open(path.as_ref())?;
        let data = Self::from_reader(BufReader::new(file), split, filters)?;
        info!(
            "Loaded {} ({} training, {} validation samples)",
            path.as_ref().display(),
            data.training.len(),
            data.validation.len()
        );
        Ok(data)
    }

    pub fn from_reader<R: BufRead>(
        reader: R,
        split: Split,
        filters: Option<&Filters>,
    ) -> Result<Self, DataError> {
        let mut samples: Vec<Sample> = Vec::new();
        let mut width = None;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut sample = parse_line(line, line_number)?;
            let expected = *width.get_or_insert(sample.features.len());
            if sample.features.len() != expected {
                return Err(DataError::Width {
                    line: line_number,
                    expected,
                    found: sample.features.len(),
                });
            }

            if let Some(filters) = filters {
                let found = sample.features.len();
                sample.features = filters.apply(&sample.features).ok_or(DataError::NotSquare {
                    line: line_number,
                    found,
                })?;
            }
            samples.push(sample);
        }

        if samples.is_empty() {
            return Err(DataError::Empty);
        }

        Ok(Self::from_samples(samples, split))
    }

    /// Feature count shared by every sample.
    pub fn feature_width(&self) -> Option<usize> {
        self.training
            .first()
            .or_else(|| self.validation.first())
            .map(|sample| sample.features.len())
    }
}

/// Parses `f1,f2,...,fn,label`.
pub fn parse_line(line: &str, line_number: usize) -> Result<Sample, DataError> {
    let mut values = line
        .split(',')
        .map(str::trim)
        .map(|value| {
            value.parse::<f64>().map_err(|_| DataError::Parse {
                line: line_number,
                value: value.to_string(),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let label = values.pop().unwrap_or(f64::NAN);
    if values.is_empty() || label.fract() != 0.0 || !(0.0..CLASS_COUNT as f64).contains(&label) {
        return Err(DataError::Label {
            line: line_number,
            value: line.rsplit(',').next().unwrap_or_default().trim().to_string(),
        });
    }

    Ok(Sample::new(values, label as u8))
}
