use anyhow::Result;

use crate::{error::PcaError, linalg::Matrix};

/// Samples as rows, features as columns, with an optional classification
/// label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Matrix,
    labels: Option<Vec<String>>,
    feature_names: Vec<String>,
}

impl FeatureMatrix {
    pub fn new(
        data: Matrix,
        labels: Option<Vec<String>>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        if feature_names.len() != data.width() {
            return Err(PcaError::InvalidDimension {
                expected: data.width(),
                found: feature_names.len(),
            }.into());
        }
        if let Some(labels) = &labels {
            if labels.len() != data.height() {
                return Err(PcaError::InvalidDimension {
                    expected: data.height(),
                    found: labels.len(),
                }.into());
            }
        }
        Ok(Self {
            data,
            labels,
            feature_names,
        })
    }

    /// Features are named `f1..fm` when no names are given.
    pub fn from_rows(
        rows: &[Vec<f64>],
        labels: Option<Vec<String>>,
        feature_names: Option<Vec<String>>,
    ) -> Result<Self> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(row) = rows.iter().find(|r| r.len() != width) {
            return Err(PcaError::InvalidDimension {
                expected: width,
                found: row.len(),
            }.into());
        }
        let data = Matrix::from_rows(rows)?;
        let feature_names = feature_names
            .unwrap_or_else(|| (1..=width).map(|i| format!("f{}", i)).collect());
        Self::new(data, labels, feature_names)
    }

    pub fn data(&self) -> &Matrix {
        &self.data
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn samples(&self) -> usize {
        self.data.height()
    }

    pub fn features(&self) -> usize {
        self.data.width()
    }
}
