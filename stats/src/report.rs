use std::io::Write;

use anyhow::{Context, Result};

use crate::{error::PcaError, linalg::SymmetricMatrix};

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVariance {
    pub name: String,
    pub variance: f64,
}

/// Pairs each feature name with its variance from the covariance diagonal,
/// most variant first. Features with equal variance stay in input order.
pub fn feature_variances(
    covariance: &SymmetricMatrix,
    feature_names: &[String],
) -> Result<Vec<FeatureVariance>> {
    if feature_names.len() != covariance.n() {
        return Err(PcaError::InvalidDimension {
            expected: covariance.n(),
            found: feature_names.len(),
        }.into());
    }
    let mut variances: Vec<FeatureVariance> = feature_names.iter()
        .zip(covariance.get_diagonal())
        .map(|(name, variance)| FeatureVariance {
            name: name.clone(),
            variance,
        })
        .collect();
    variances.sort_by(|a, b| b.variance.total_cmp(&a.variance));
    Ok(variances)
}

/// One feature name per line, most variant first.
pub fn write_feature_ranking<W: Write>(writer: &mut W, ranking: &[FeatureVariance]) -> Result<()> {
    for feature in ranking {
        writeln!(writer, "{}", feature.name).context("Writing feature ranking")?;
    }
    writer.flush().context("Writing feature ranking")?;
    Ok(())
}

/// `name(variance), name(variance), ...`
pub fn format_feature_summary(ranking: &[FeatureVariance]) -> String {
    ranking.iter()
        .map(|f| format!("{}({})", f.name, f.variance))
        .collect::<Vec<String>>()
        .join(", ")
}
