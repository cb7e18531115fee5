use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    covariance::{center, covariance_matrix},
    dataset::FeatureMatrix,
    eigen::{decompose, EigenDecomposer},
    error::PcaError,
    linalg::{Matrix, SymmetricMatrix},
    mean::mean_vector,
    projection::{build_basis, project, ProjectionBasis},
    rank::{explained_variance, rank_eigenpairs, ComponentVariance, RankedEigenList},
    report::{feature_variances, FeatureVariance},
};

pub const DEFAULT_REDUCED_DIMENSION: usize = 10;

/// Which version of the data is multiplied by the basis. The covariance is
/// always computed from centered data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Centering {
    #[default]
    Centered,
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PcaConfig {
    pub reduced_dimension: usize,
    pub centering: Centering,
}

impl Default for PcaConfig {
    fn default() -> Self {
        Self {
            reduced_dimension: DEFAULT_REDUCED_DIMENSION,
            centering: Centering::default(),
        }
    }
}

/// Everything derived during one run. Nothing here is mutated after the
/// stage that produced it.
#[derive(Debug, Clone)]
pub struct PcaResult {
    pub mean: Vec<f64>,
    pub covariance: SymmetricMatrix,
    pub ranked: RankedEigenList,
    pub explained: Vec<ComponentVariance>,
    pub feature_variances: Vec<FeatureVariance>,
    pub basis: ProjectionBasis,
    /// `n x k`, rows in input order.
    pub reduced: Matrix,
    pub labels: Option<Vec<String>>,
    pub centering: Centering,
}

impl PcaResult {
    /// Share of the total variance kept by the basis.
    pub fn retained_variance(&self) -> f64 {
        self.explained
            .get(self.basis.components().saturating_sub(1))
            .map(|c| c.cumulative_ratio)
            .unwrap_or(0.0)
    }
}

pub fn run(
    features: &FeatureMatrix,
    decomposer: &dyn EigenDecomposer,
    config: &PcaConfig,
) -> Result<PcaResult> {
    let m = features.features();
    // check k before doing the expensive work
    if config.reduced_dimension == 0 || config.reduced_dimension > m {
        return Err(PcaError::InvalidReducedDimension {
            k: config.reduced_dimension,
            m,
        }.into());
    }

    let mean = mean_vector(features).context("Estimating feature means")?;
    let covariance = covariance_matrix(features, &mean).context("Building covariance matrix")?;
    let pairs = decompose(decomposer, &covariance).context("Decomposing covariance matrix")?;
    let ranked = rank_eigenpairs(pairs).context("Ranking eigenpairs")?;
    debug!("ranked eigenvalues: {:?}", ranked.values());
    let explained = explained_variance(&ranked);
    let feature_variances = feature_variances(&covariance, features.feature_names())
        .context("Ranking feature variances")?;

    let basis = build_basis(&ranked, config.reduced_dimension)
        .context("Building projection basis")?;
    let reduced = match config.centering {
        Centering::Centered => {
            let centered = center(features, &mean).context("Centering feature matrix")?;
            project(&centered, &basis)
        }
        Centering::Raw => project(features.data(), &basis),
    }.context("Projecting feature matrix")?;

    let result = PcaResult {
        mean,
        covariance,
        ranked,
        explained,
        feature_variances,
        basis,
        reduced,
        labels: features.labels().map(|l| l.to_vec()),
        centering: config.centering,
    };
    info!(
        "reduced {} samples from {} to {} features ({:?}), retaining {:.2}% of variance",
        features.samples(),
        m,
        config.reduced_dimension,
        config.centering,
        result.retained_variance() * 100.0,
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        eigen::{EigenPair, FixedDecomposer, NalgebraDecomposer},
        linalg::norm,
        projection::reconstruct,
    };

    fn axis_example() -> FeatureMatrix {
        FeatureMatrix::from_rows(&[
            vec![2.0, 0.0],
            vec![0.0, 2.0],
            vec![-2.0, 0.0],
            vec![0.0, -2.0],
        ], Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]), None).unwrap()
    }

    fn config(k: usize, centering: Centering) -> PcaConfig {
        PcaConfig {
            reduced_dimension: k,
            centering,
        }
    }

    #[test]
    fn test_default_config() {
        let config = PcaConfig::default();

        assert_eq!(config.reduced_dimension, 10);
        assert_eq!(config.centering, Centering::Centered);
    }

    #[test]
    fn test_axis_example_end_to_end() {
        let fm = axis_example();

        let result = run(&fm, &NalgebraDecomposer::default(), &config(1, Centering::Centered)).unwrap();

        assert_eq!(result.mean, vec![0.0, 0.0]);
        for value in result.ranked.values() {
            assert_relative_eq!(value, 8.0 / 3.0, epsilon = 1e-9);
        }
        let axis = result.basis.matrix().get_col(0).unwrap();
        assert_relative_eq!(norm(&axis), 1.0, epsilon = 1e-9);
        // tied eigenvalues: any unit vector in the plane is valid, the
        // reduced value must still be the coordinate along that vector
        for (r, row) in fm.data().rows().enumerate() {
            let expected = row[0] * axis[0] + row[1] * axis[1];
            assert_relative_eq!(result.reduced.get(r, 0).unwrap(), expected, epsilon = 1e-9);
        }
        assert_eq!(result.labels, Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]));
    }

    #[test]
    fn test_axis_example_with_fixed_solver() {
        let fm = axis_example();
        let solver = FixedDecomposer::new(vec![
            EigenPair::new(8.0 / 3.0, vec![0.0, 1.0]),
            EigenPair::new(8.0 / 3.0, vec![1.0, 0.0]),
        ]);

        let result = run(&fm, &solver, &config(1, Centering::Centered)).unwrap();

        assert_eq!(result.reduced, Matrix::new(vec![0.0, 2.0, 0.0, -2.0], 4, 1).unwrap());
    }

    #[test]
    fn test_trace_matches_eigenvalue_sum() {
        let fm = FeatureMatrix::from_rows(&[
            vec![2.5, 2.4, 0.3],
            vec![0.5, 0.7, 1.1],
            vec![2.2, 2.9, -0.4],
            vec![1.9, 2.2, 0.0],
            vec![3.1, 3.0, 0.9],
            vec![2.3, 2.7, 1.5],
        ], None, None).unwrap();

        let result = run(&fm, &NalgebraDecomposer::default(), &config(2, Centering::Centered)).unwrap();

        let total: f64 = result.ranked.values().iter().sum();
        assert_relative_eq!(total, result.covariance.trace(), max_relative = 1e-6);
        for window in result.ranked.values().windows(2) {
            assert!(window[0] >= window[1]);
        }
        assert_relative_eq!(result.explained.last().unwrap().cumulative_ratio, 1.0, epsilon = 1e-9);
        assert_eq!(result.reduced.height(), 6);
        assert_eq!(result.reduced.width(), 2);
    }

    #[test]
    fn test_full_rank_round_trip() {
        let fm = FeatureMatrix::from_rows(&[
            vec![1.0, 4.0, -2.0],
            vec![3.0, 1.0, 0.5],
            vec![-1.0, 2.0, 2.0],
            vec![0.0, -3.0, 1.0],
            vec![2.5, 0.5, -1.5],
        ], None, None).unwrap();

        let result = run(&fm, &NalgebraDecomposer::default(), &config(3, Centering::Centered)).unwrap();

        let centered = center(&fm, &result.mean).unwrap();
        let restored = reconstruct(&result.reduced, &result.basis).unwrap();
        for (a, b) in restored.elements().iter().zip(centered.elements()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_raw_projection_skips_centering() {
        let fm = FeatureMatrix::from_rows(&[
            vec![11.0, 5.0],
            vec![9.0, 5.0],
            vec![10.0, 5.0],
        ], None, None).unwrap();
        let solver = FixedDecomposer::new(vec![
            EigenPair::new(0.0, vec![0.0, 1.0]),
            EigenPair::new(1.0, vec![1.0, 0.0]),
        ]);

        let raw = run(&fm, &solver, &config(1, Centering::Raw)).unwrap();
        let centered = run(&fm, &solver, &config(1, Centering::Centered)).unwrap();

        assert_eq!(raw.reduced, Matrix::new(vec![11.0, 9.0, 10.0], 3, 1).unwrap());
        assert_eq!(centered.reduced, Matrix::new(vec![1.0, -1.0, 0.0], 3, 1).unwrap());
        assert_eq!(raw.centering, Centering::Raw);
    }

    #[test]
    fn test_feature_variances_use_names() {
        let fm = FeatureMatrix::from_rows(&[
            vec![1.0, 10.0],
            vec![2.0, 20.0],
            vec![3.0, 30.0],
        ], None, Some(vec!["small".into(), "large".into()])).unwrap();

        let result = run(&fm, &NalgebraDecomposer::default(), &config(1, Centering::Centered)).unwrap();

        let names: Vec<&str> = result.feature_variances.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["large", "small"]);
        assert_relative_eq!(result.feature_variances[0].variance, 100.0, epsilon = 1e-9);
        assert_relative_eq!(result.retained_variance(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_dimension() {
        let fm = axis_example();

        for k in [0, 3] {
            let err = run(&fm, &NalgebraDecomposer::default(), &config(k, Centering::Centered))
                .unwrap_err();

            assert_eq!(
                err.downcast_ref::<PcaError>(),
                Some(&PcaError::InvalidReducedDimension { k, m: 2 }),
            );
        }
    }

    #[test]
    fn test_rejects_default_dimension_on_narrow_data() {
        let fm = axis_example();

        let err = run(&fm, &NalgebraDecomposer::default(), &PcaConfig::default()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<PcaError>(),
            Some(&PcaError::InvalidReducedDimension { k: 10, m: 2 }),
        );
    }

    #[test]
    fn test_rejects_single_sample() {
        let fm = FeatureMatrix::from_rows(&[vec![1.0, 2.0]], None, None).unwrap();

        let err = run(&fm, &NalgebraDecomposer::default(), &config(1, Centering::Centered))
            .unwrap_err();

        assert_eq!(err.downcast_ref::<PcaError>(), Some(&PcaError::InsufficientSamples(1)));
    }

    #[test]
    fn test_rejects_empty() {
        let data = Matrix::new(vec![], 0, 2).unwrap();
        let fm = FeatureMatrix::new(data, None, vec!["x".into(), "y".into()]).unwrap();

        let err = run(&fm, &NalgebraDecomposer::default(), &config(1, Centering::Centered))
            .unwrap_err();

        assert_eq!(err.downcast_ref::<PcaError>(), Some(&PcaError::EmptyDataset));
    }
}
