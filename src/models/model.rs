//! The DISPXY dispersion model.
//!
//! The model maps a pixel position `(x, y)` and a trace parameter `t` to a
//! dispersion offset through two quadratic surfaces contracted against the
//! monomial basis (see [`crate::math::basis`]):
//!
//! - `A(x, y) = basis(x, y) · row0` (additive, zero-order term)
//! - `B(x, y) = basis(x, y) · row1` (multiplicative, slope term)
//!
//! Forward: `A + t·B − offset`. Inverse: `(t + offset − A) / B`, where `t` is
//! the already-known dispersion quantity and the result is the trace
//! parameter.

use nalgebra::SMatrix;

use crate::error::{DispersionError, Result};
use crate::math::{BASIS_LEN, contract};

/// Coefficient rows (additive, multiplicative).
pub const COEFFICIENT_ROWS: usize = 2;

pub type CoefficientMatrix = SMatrix<f64, COEFFICIENT_ROWS, BASIS_LEN>;

/// Bivariate quadratic dispersion relation, forward or inverse.
///
/// Immutable once built. The 2x6 shape is carried by the matrix type, so a
/// constructed model can always be evaluated; dynamically shaped input goes
/// through [`DispersionModel::from_rows`], which rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispersionModel {
    matrix: CoefficientMatrix,
    offset: f64,
    inverse: bool,
}

impl DispersionModel {
    pub const NAME: &'static str = "DISPXY_Model";

    pub fn new(matrix: CoefficientMatrix, offset: f64, inverse: bool) -> Self {
        Self {
            matrix,
            offset,
            inverse,
        }
    }

    /// Forward model (`inverse = false`).
    pub fn forward(matrix: CoefficientMatrix, offset: f64) -> Self {
        Self::new(matrix, offset, false)
    }

    /// Build a model from nested rows, validating the 2x6 shape.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R], offset: f64, inverse: bool) -> Result<Self> {
        if rows.len() != COEFFICIENT_ROWS {
            return Err(DispersionError::Shape {
                rows: rows.len(),
                cols: rows.first().map_or(0, |r| r.as_ref().len()),
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != BASIS_LEN) {
            return Err(DispersionError::Shape {
                rows: rows.len(),
                cols: bad.as_ref().len(),
            });
        }

        let matrix = CoefficientMatrix::from_fn(|i, j| rows[i].as_ref()[j]);
        Ok(Self::new(matrix, offset, inverse))
    }

    pub fn matrix(&self) -> &CoefficientMatrix {
        &self.matrix
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Coefficient rows as nested vectors, in persisted order.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.matrix
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Same coefficients and offset with the direction flipped.
    pub fn inverted(&self) -> Self {
        Self::new(self.matrix, self.offset, !self.inverse)
    }

    /// Inputs are `(x, y, t)`.
    pub fn n_inputs(&self) -> usize {
        3
    }

    pub fn n_outputs(&self) -> usize {
        1
    }

    /// The additive and multiplicative terms `(A, B)` at `(x, y)`.
    pub fn terms(&self, x: f64, y: f64) -> (f64, f64) {
        let a = contract(&self.matrix.row(0).into_owned(), x, y);
        let b = contract(&self.matrix.row(1).into_owned(), x, y);
        (a, b)
    }

    /// Evaluate the model at `(x, y, t)`.
    ///
    /// In inverse mode a zero multiplicative term divides by zero and yields
    /// infinity or NaN per IEEE 754; use [`Self::evaluate_checked`] to get an
    /// error instead.
    pub fn evaluate(&self, x: f64, y: f64, t: f64) -> f64 {
        let (a, b) = self.terms(x, y);
        if self.inverse {
            (t + self.offset - a) / b
        } else {
            a + t * b - self.offset
        }
    }

    /// Like [`Self::evaluate`], but a degenerate inverse is an error.
    ///
    /// The inverse is degenerate when the multiplicative term is zero, NaN or
    /// infinite.
    pub fn evaluate_checked(&self, x: f64, y: f64, t: f64) -> Result<f64> {
        if self.inverse {
            let (_, b) = self.terms(x, y);
            if b == 0.0 || !b.is_finite() {
                return Err(DispersionError::ArithmeticDegenerate { x, y });
            }
        }
        Ok(self.evaluate(x, y, t))
    }

    /// Evaluate element-wise over equally long input slices.
    pub fn evaluate_batch(&self, x: &[f64], y: &[f64], t: &[f64]) -> Result<Vec<f64>> {
        if x.len() != y.len() || x.len() != t.len() {
            return Err(DispersionError::LengthMismatch {
                x: x.len(),
                y: y.len(),
                t: t.len(),
            });
        }

        Ok(x.iter()
            .zip(y)
            .zip(t)
            .map(|((&x, &y), &t)| self.evaluate(x, y, t))
            .collect())
    }
}
