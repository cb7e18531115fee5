use anyhow::Result;

use crate::{eigen::EigenPair, error::PcaError};

/// Eigenpairs sorted by descending eigenvalue. Equal eigenvalues keep the
/// order the solver returned them in.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEigenList {
    pairs: Vec<EigenPair>,
}

impl RankedEigenList {
    pub fn pairs(&self) -> &[EigenPair] {
        &self.pairs
    }

    pub fn values(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Length of each eigenvector.
    pub fn dimension(&self) -> usize {
        self.pairs.first().map(|p| p.vector.len()).unwrap_or(0)
    }
}

/// Variance explained by one ranked component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentVariance {
    /// 0-based position in the ranked list.
    pub index: usize,
    pub eigenvalue: f64,
    /// `eigenvalue / total`
    pub ratio: f64,
    /// Running sum up to and including this component, over the total.
    pub cumulative_ratio: f64,
}

pub fn rank_eigenpairs(pairs: Vec<EigenPair>) -> Result<RankedEigenList> {
    if pairs.is_empty() {
        return Err(PcaError::EmptyDataset.into());
    }
    let mut pairs = pairs;
    // sort_by is stable; total_cmp keeps NaN from poisoning the order
    pairs.sort_by(|a, b| b.value.total_cmp(&a.value));
    Ok(RankedEigenList { pairs })
}

/// Ratios are all 0.0 when the eigenvalues sum to zero.
pub fn explained_variance(ranked: &RankedEigenList) -> Vec<ComponentVariance> {
    let total: f64 = ranked.pairs.iter().map(|p| p.value).sum();
    let mut cumulative = 0.0;
    ranked.pairs.iter()
        .enumerate()
        .map(|(index, pair)| {
            cumulative += pair.value;
            let (ratio, cumulative_ratio) = if total == 0.0 {
                (0.0, 0.0)
            } else {
                (pair.value / total, cumulative / total)
            };
            ComponentVariance {
                index,
                eigenvalue: pair.value,
                ratio,
                cumulative_ratio,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn pair(value: f64, tag: f64) -> EigenPair {
        EigenPair::new(value, vec![tag, 0.0])
    }

    #[test]
    fn test_rank_descending() {
        let pairs = vec![
            pair(1.0, 1.0),
            pair(5.0, 2.0),
            pair(-0.5, 3.0),
            pair(3.0, 4.0),
        ];

        let ranked = rank_eigenpairs(pairs).unwrap();

        assert_eq!(ranked.values(), vec![5.0, 3.0, 1.0, -0.5]);
        for window in ranked.pairs().windows(2) {
            assert!(window[0].value >= window[1].value);
        }
    }

    #[test]
    fn test_rank_ties_keep_solver_order() {
        let pairs = vec![
            pair(2.0, 1.0),
            pair(7.0, 2.0),
            pair(2.0, 3.0),
            pair(2.0, 4.0),
        ];

        let ranked = rank_eigenpairs(pairs).unwrap();

        let tags: Vec<f64> = ranked.pairs().iter().map(|p| p.vector[0]).collect();
        assert_eq!(tags, vec![2.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_rank_empty() {
        let err = rank_eigenpairs(vec![]).unwrap_err();

        assert_eq!(err.downcast_ref::<PcaError>(), Some(&PcaError::EmptyDataset));
    }

    #[test]
    fn test_explained_variance() {
        let ranked = rank_eigenpairs(vec![
            pair(1.0, 0.0),
            pair(6.0, 0.0),
            pair(3.0, 0.0),
        ]).unwrap();

        let explained = explained_variance(&ranked);

        let ratios: Vec<f64> = explained.iter().map(|c| c.ratio).collect();
        let cumulative: Vec<f64> = explained.iter().map(|c| c.cumulative_ratio).collect();
        assert_eq!(ratios, vec![0.6, 0.3, 0.1]);
        assert_eq!(crate::linalg::round(&cumulative, 12), vec![0.6, 0.9, 1.0]);
        assert_eq!(explained[2].index, 2);
        assert_eq!(explained[2].eigenvalue, 1.0);
    }

    #[test]
    fn test_explained_variance_bounds() {
        let ranked = rank_eigenpairs(vec![
            pair(0.3, 0.0),
            pair(12.5, 0.0),
            pair(0.0, 0.0),
            pair(4.1, 0.0),
            pair(4.1, 0.0),
        ]).unwrap();

        let explained = explained_variance(&ranked);

        for window in explained.windows(2) {
            assert!(window[0].cumulative_ratio <= window[1].cumulative_ratio);
        }
        assert_relative_eq!(explained.last().unwrap().cumulative_ratio, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_explained_variance_zero_total() {
        let ranked = rank_eigenpairs(vec![pair(0.0, 0.0), pair(0.0, 1.0)]).unwrap();

        let explained = explained_variance(&ranked);

        assert!(explained.iter().all(|c| c.ratio == 0.0 && c.cumulative_ratio == 0.0));
    }
}
