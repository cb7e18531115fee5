use std::{error::Error, fmt::Display};

/// Precondition failures of the PCA pipeline. None of these are retried;
/// the current run is aborted.
#[derive(Debug, Clone, PartialEq)]
pub enum PcaError {
    /// No samples at all.
    EmptyDataset,
    /// Sample covariance needs at least two rows.
    InsufficientSamples(usize),
    /// Requested `k` is outside `1..=m`.
    InvalidReducedDimension { k: usize, m: usize },
    /// Shape mismatch between two stages.
    InvalidDimension { expected: usize, found: usize },
    /// The eigensolver broke its contract.
    Decomposition(String),
}

impl Display for PcaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PcaError::EmptyDataset => write!(f, "EmptyDataset: the feature matrix has no rows"),
            PcaError::InsufficientSamples(n) => write!(
                f,
                "InsufficientSamples: covariance needs at least 2 rows, got {}",
                n,
            ),
            PcaError::InvalidReducedDimension { k, m } => write!(
                f,
                "InvalidReducedDimension: k = {} must be within 1..={}",
                k, m,
            ),
            PcaError::InvalidDimension { expected, found } => write!(
                f,
                "InvalidDimension: expected {} but found {}",
                expected, found,
            ),
            PcaError::Decomposition(msg) => write!(f, "Decomposition: {}", msg),
        }
    }
}

impl Error for PcaError {}
