//! Principal component analysis over labelled feature tables.
//!
//! A run goes through [`mean`], [`covariance`], [`eigen`], [`rank`] and
//! [`projection`] in that order; [`pca::run`] wires them together.

pub mod covariance;
pub mod dataset;
pub mod eigen;
pub mod error;
pub mod linalg;
pub mod mean;
pub mod pca;
pub mod projection;
pub mod rank;
pub mod report;
pub mod table;
