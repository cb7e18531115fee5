use std::{error::Error, fmt::Display};

use anyhow::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    // Row major. Only f64 is needed by the pipeline.
    elements: Vec<f64>,
    width: usize,
    height: usize,
}

impl Matrix {
    pub fn new(elements: Vec<f64>, height: usize, width: usize) -> Result<Self> {
        if elements.len() != width * height {
            return Err(MatrixError::SizeMismatch.into());
        }

        Ok(Self {
            elements,
            height,
            width,
        })
    }

    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            elements: vec![0.0; height * width],
            height,
            width,
        }
    }

    /// Build a matrix from rows of equal length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut elements = Vec::with_capacity(rows.len() * width);
        for row in rows {
            if row.len() != width {
                return Err(MatrixError::SizeMismatch.into());
            }
            elements.extend_from_slice(row);
        }
        Ok(Self {
            elements,
            height: rows.len(),
            width,
        })
    }

    pub fn mul(&self, matrix: &Matrix) -> Result<Matrix> {
        if self.width != matrix.height {
            return Err(MatrixError::SizeMismatch.into());
        }

        let mut elements: Vec<f64> = Vec::with_capacity(self.height * matrix.width);
        for ij in 0..self.height * matrix.width {
            let column = ij % matrix.width;
            let row = ij / matrix.width;
            let mut value = 0.0;
            for i in 0..self.width {
                let a = self.get_unchecked(row, i);
                let b = matrix.get_unchecked(i, column);
                value += a * b;
            }

            elements.push(value);
        }
        Ok(Matrix {
            elements,
            width: matrix.width,
            height: self.height,
        })
    }

    pub fn sub(&self, matrix: &Matrix) -> Result<Self> {
        if self.width != matrix.width || self.height != matrix.height {
            return Err(MatrixError::SizeMismatch.into());
        }
        let elements = self.elements.iter()
            .zip(matrix.elements.iter())
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self {
            elements,
            width: self.width,
            height: self.height,
        })
    }

    pub fn row(&self, i: usize) -> Result<&[f64], MatrixError> {
        if i >= self.height {
            return Err(MatrixError::OutOfBounds);
        }
        Ok(&self.elements[i * self.width..(i + 1) * self.width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on 0
        self.elements.chunks_exact(self.width.max(1)).take(self.height)
    }

    pub fn get_col(&self, i: usize) -> Result<Vec<f64>, MatrixError> {
        if i >= self.width {
            return Err(MatrixError::OutOfBounds);
        }
        let mut elements: Vec<f64> = Vec::with_capacity(self.height);
        for j in 0..self.height {
            elements.push(self.get_unchecked(j, i));
        }
        Ok(elements)
    }

    pub fn set_col(&mut self, i: usize, column: &[f64]) -> Result<(), MatrixError> {
        if i >= self.width {
            return Err(MatrixError::OutOfBounds);
        }
        if column.len() != self.height {
            return Err(MatrixError::SizeMismatch);
        }

        for j in 0..self.height {
            self.set_unchecked(j, i, column[j]);
        }

        Ok(())
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64, MatrixError> {
        if row >= self.height || col >= self.width {
            Err(MatrixError::OutOfBounds)
        } else {
            Ok(self.get_unchecked(row, col))
        }
    }

    pub fn set_unchecked(&mut self, row: usize, col: usize, value: f64) {
        self.elements[row * self.width + col] = value;
    }

    pub fn get_unchecked(&self, row: usize, col: usize) -> f64 {
        self.elements[row * self.width + col]
    }

    pub fn transpose(&self) -> Matrix {
        let mut elements: Vec<f64> = Vec::with_capacity(self.elements.len());
        for i in 0..self.width {
            for j in 0..self.height {
                elements.push(self.get_unchecked(j, i));
            }
        }
        Matrix {
            elements,
            width: self.height,
            height: self.width,
        }
    }

    pub fn round(&self, places: i32) -> Self {
        let shift = 10.0_f64.powi(places);
        let elements = self.elements.iter()
            .map(|a| (a * shift).round() / shift)
            .collect();
        Self {
            elements,
            width: self.width,
            height: self.height,
        }
    }

    pub fn mean_row(&self) -> Vec<f64> {
        let mut elements = vec![0.0; self.width];
        for row in self.rows() {
            for (sum, value) in elements.iter_mut().zip(row) {
                *sum += value;
            }
        }
        for sum in elements.iter_mut() {
            *sum /= self.height as f64;
        }
        elements
    }

    pub fn elements(&self) -> &[f64] {
        &self.elements
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// A square matrix with `m[i][j] == m[j][i]`, within `SYMMETRY_TOLERANCE`
/// relative to the largest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricMatrix {
    matrix: Matrix,
    n: usize,
}

const SYMMETRY_TOLERANCE: f64 = 1e-9;

impl SymmetricMatrix {
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get_diagonal(&self) -> Vec<f64> {
        let mut elements = Vec::with_capacity(self.n);
        for i in 0..self.n {
            elements.push(self.matrix.get_unchecked(i, i));
        }
        elements
    }

    pub fn trace(&self) -> f64 {
        self.get_diagonal().iter().sum()
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}

impl TryFrom<Matrix> for SymmetricMatrix {
    type Error = MatrixError;
    fn try_from(value: Matrix) -> std::result::Result<Self, Self::Error> {
        if value.height != value.width {
            return Err(MatrixError::NotSquare);
        }
        let scale = value.elements.iter().fold(1.0_f64, |acc, a| acc.max(a.abs()));
        for i in 0..value.height {
            for j in i + 1..value.width {
                let diff = value.get_unchecked(i, j) - value.get_unchecked(j, i);
                if diff.abs() > SYMMETRY_TOLERANCE * scale {
                    return Err(MatrixError::NotSymmetric);
                }
            }
        }
        Ok(SymmetricMatrix {
            n: value.width,
            matrix: value,
        })
    }
}

impl From<SymmetricMatrix> for Matrix {
    fn from(value: SymmetricMatrix) -> Self {
        value.matrix
    }
}

pub fn dot(u: &[f64], v: &[f64]) -> f64 {
    u.iter()
        .zip(v.iter())
        .fold(0.0, |acc, (a, b)| acc + a * b)
}

/// `u` repeated as every row of a `height x u.len()` matrix.
pub fn matrix_rows(u: &[f64], height: usize) -> Matrix {
    Matrix {
        elements: u.repeat(height),
        height,
        width: u.len(),
    }
}

pub fn norm(u: &[f64]) -> f64 {
    u.iter()
        .fold(0.0, |acc, a| acc + a * a)
        .sqrt()
}

pub fn round(u: &[f64], places: i32) -> Vec<f64> {
    let shift = 10.0_f64.powi(places);
    u.iter()
        .map(|a| (a * shift).round() / shift)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixError {
    SizeMismatch,
    OutOfBounds,
    NotSquare,
    NotSymmetric,
}

impl Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MatrixError {}
