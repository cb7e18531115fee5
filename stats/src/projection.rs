use anyhow::{Context, Result};
use log::debug;

use crate::{error::PcaError, linalg::Matrix, rank::RankedEigenList};

/// `m x k` matrix whose columns are the top `k` ranked eigenvectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionBasis {
    matrix: Matrix,
}

impl ProjectionBasis {
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Number of input features.
    pub fn features(&self) -> usize {
        self.matrix.height()
    }

    /// Number of kept components.
    pub fn components(&self) -> usize {
        self.matrix.width()
    }
}

/// Fails unless `1 <= k <= m`; `k` is never clamped.
pub fn build_basis(ranked: &RankedEigenList, k: usize) -> Result<ProjectionBasis> {
    let m = ranked.len();
    if k == 0 || k > m {
        return Err(PcaError::InvalidReducedDimension { k, m }.into());
    }
    let height = ranked.dimension();
    let mut matrix = Matrix::zeros(height, k);
    for (column, pair) in ranked.pairs().iter().take(k).enumerate() {
        // set_col rejects a vector that would leave the column partly filled
        matrix.set_col(column, &pair.vector)
            .map_err(|_| PcaError::InvalidDimension {
                expected: height,
                found: pair.vector.len(),
            })?;
    }
    debug!("built {}x{} projection basis", matrix.height(), matrix.width());
    Ok(ProjectionBasis { matrix })
}

/// `data * basis`, one reduced row per input row.
pub fn project(data: &Matrix, basis: &ProjectionBasis) -> Result<Matrix> {
    if data.width() != basis.features() {
        return Err(PcaError::InvalidDimension {
            expected: basis.features(),
            found: data.width(),
        }.into());
    }
    data.mul(&basis.matrix).context("Projecting onto basis")
}

/// `reduced * basis^T`, mapping reduced rows back into feature space. Only
/// lossless when the basis has full rank and is orthonormal.
pub fn reconstruct(reduced: &Matrix, basis: &ProjectionBasis) -> Result<Matrix> {
    if reduced.width() != basis.components() {
        return Err(PcaError::InvalidDimension {
            expected: basis.components(),
            found: reduced.width(),
        }.into());
    }
    reduced.mul(&basis.matrix.transpose()).context("Reconstructing from basis")
}
