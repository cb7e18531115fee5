//! Eigendecomposition of the covariance matrix.
//!
//! The solver is injected through [`EigenDecomposer`] so the pipeline does
//! not depend on a particular numerical library. [`NalgebraDecomposer`] is
//! the default; [`FixedDecomposer`] replays precomputed pairs.

use anyhow::Result;
use log::{debug, warn};
use nalgebra::{DMatrix, SymmetricEigen};

use crate::{
    error::PcaError,
    linalg::{norm, SymmetricMatrix},
};

/// Eigenvalue with its unit length eigenvector. The sign of the vector is
/// whatever the solver produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenPair {
    pub value: f64,
    pub vector: Vec<f64>,
}

impl EigenPair {
    pub fn new(value: f64, vector: Vec<f64>) -> Self {
        Self { value, vector }
    }
}

/// Returns exactly `n` eigenpairs of a symmetric `n x n` matrix, in no
/// particular order.
pub trait EigenDecomposer {
    fn decompose(&self, matrix: &SymmetricMatrix) -> Result<Vec<EigenPair>>;
}

/// Symmetric eigensolver backed by `nalgebra::SymmetricEigen`.
#[derive(Debug, Clone, Copy)]
pub struct NalgebraDecomposer {
    pub eps: f64,
    pub max_iter: usize,
}

impl Default for NalgebraDecomposer {
    fn default() -> Self {
        Self {
            eps: f64::EPSILON,
            max_iter: 10_000,
        }
    }
}

impl EigenDecomposer for NalgebraDecomposer {
    fn decompose(&self, matrix: &SymmetricMatrix) -> Result<Vec<EigenPair>> {
        let n = matrix.n();
        if n == 0 {
            return Ok(Vec::new());
        }
        let m = DMatrix::from_row_slice(n, n, matrix.matrix().elements());
        let eigen = SymmetricEigen::try_new(m, self.eps, self.max_iter)
            .ok_or_else(|| PcaError::Decomposition(format!(
                "symmetric eigensolver did not converge in {} iterations",
                self.max_iter,
            )))?;

        let pairs = eigen.eigenvalues.iter()
            .zip(eigen.eigenvectors.column_iter())
            .map(|(value, vector)| EigenPair::new(*value, vector.iter().copied().collect()))
            .collect();
        Ok(pairs)
    }
}

/// Hands back a fixed list of pairs regardless of the input matrix.
#[derive(Debug, Clone, Default)]
pub struct FixedDecomposer {
    pub pairs: Vec<EigenPair>,
}

impl FixedDecomposer {
    pub fn new(pairs: Vec<EigenPair>) -> Self {
        Self { pairs }
    }
}

impl EigenDecomposer for FixedDecomposer {
    fn decompose(&self, _matrix: &SymmetricMatrix) -> Result<Vec<EigenPair>> {
        Ok(self.pairs.clone())
    }
}

/// Runs `decomposer` and enforces its contract: `n` pairs, each vector of
/// length `n`, finite values, vectors rescaled to unit length.
pub fn decompose(
    decomposer: &dyn EigenDecomposer,
    matrix: &SymmetricMatrix,
) -> Result<Vec<EigenPair>> {
    let n = matrix.n();
    let mut pairs = decomposer.decompose(matrix)?;
    if pairs.len() != n {
        return Err(PcaError::Decomposition(format!(
            "expected {} eigenpairs, solver returned {}",
            n,
            pairs.len(),
        )).into());
    }

    // Anything more negative than this is not round-off.
    let tolerance = 1e-9 * matrix.trace().abs().max(1.0);
    for (i, pair) in pairs.iter_mut().enumerate() {
        if pair.vector.len() != n {
            return Err(PcaError::InvalidDimension {
                expected: n,
                found: pair.vector.len(),
            }.into());
        }
        if !pair.value.is_finite() {
            return Err(PcaError::Decomposition(format!(
                "eigenvalue {} is not finite",
                i,
            )).into());
        }
        let length = norm(&pair.vector);
        if length == 0.0 || !length.is_finite() {
            return Err(PcaError::Decomposition(format!(
                "eigenvector {} cannot be normalised",
                i,
            )).into());
        }
        for a in pair.vector.iter_mut() {
            *a /= length;
        }
        if pair.value < -tolerance {
            warn!("eigenvalue {} is negative ({}); covariance is not positive semi-definite", i, pair.value);
        }
    }
    debug!("decomposed {}x{} matrix into {} eigenpairs", n, n, pairs.len());
    Ok(pairs)
}
