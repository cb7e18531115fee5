use anyhow::{Context, Result};
use log::debug;

use crate::{
    dataset::FeatureMatrix,
    error::PcaError,
    linalg::{matrix_rows, Matrix, SymmetricMatrix},
};

/// Copy of the data with `mean` subtracted from every row. The input is
/// left untouched.
pub fn center(features: &FeatureMatrix, mean: &[f64]) -> Result<Matrix> {
    let data = features.data();
    if mean.len() != data.width() {
        return Err(PcaError::InvalidDimension {
            expected: data.width(),
            found: mean.len(),
        }.into());
    }
    data.sub(&matrix_rows(mean, data.height()))
}

/// Unbiased sample covariance (divides by `n - 1`).
///
/// This is `O(n * m^2)` and dominates the cost of a pipeline run. Only the
/// upper triangle is accumulated; the lower triangle is mirrored so the
/// result is exactly symmetric.
pub fn covariance_matrix(features: &FeatureMatrix, mean: &[f64]) -> Result<SymmetricMatrix> {
    let n = features.samples();
    if n < 2 {
        return Err(PcaError::InsufficientSamples(n).into());
    }
    let centered = center(features, mean).context("Centering feature matrix")?;
    let m = centered.width();
    debug!("building {}x{} covariance matrix from {} samples", m, m, n);

    let mut cov = Matrix::zeros(m, m);
    for i in 0..m {
        for j in i..m {
            let mut total = 0.0;
            for row in centered.rows() {
                total += row[i] * row[j];
            }
            let value = total / (n - 1) as f64;
            cov.set_unchecked(i, j, value);
            cov.set_unchecked(j, i, value);
        }
    }
    let cov: SymmetricMatrix = cov.try_into()?;
    Ok(cov)
}
