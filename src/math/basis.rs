//! Monomial basis for the bivariate quadratic dispersion polynomial.
//!
//! Both coefficient rows are contracted against the same basis vector:
//!
//! ```text
//! basis(x, y) = [1, x, y, x², x·y, y²]
//! ```
//!
//! The order is part of the persisted format: column `k` of a stored
//! coefficient row multiplies `basis[k]`.

use nalgebra::{RowSVector, SVector};

/// Number of monomials in the basis.
pub const BASIS_LEN: usize = 6;

/// Basis vector as a column.
pub type Basis = SVector<f64, BASIS_LEN>;

/// One coefficient row of the dispersion matrix.
pub type CoefficientRow = RowSVector<f64, BASIS_LEN>;

/// Build the monomial basis at pixel position `(x, y)`.
pub fn monomial_basis(x: f64, y: f64) -> Basis {
    Basis::new(1.0, x, y, x * x, x * y, y * y)
}

/// Contract a coefficient row with the basis at `(x, y)`.
pub fn contract(row: &CoefficientRow, x: f64, y: f64) -> f64 {
    row.transpose().dot(&monomial_basis(x, y))
}
