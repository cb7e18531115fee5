use anyhow::Result;

use crate::{dataset::FeatureMatrix, error::PcaError};

/// Per-feature column means of the sample rows.
pub fn mean_vector(features: &FeatureMatrix) -> Result<Vec<f64>> {
    if features.samples() == 0 {
        return Err(PcaError::EmptyDataset.into());
    }
    Ok(features.data().mean_row())
}
