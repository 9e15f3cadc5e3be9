//! # LU decomposition
//!
//! Gaussian elimination with partial pivoting, computing `PA = LU` for any (also rectangular)
//! matrix `A`. The result is cached inside the matrix.
use log::trace;
use num_traits::Zero;

use crate::data::linear_algebra::decomposition::permutation::{FullPermutation, Permutation};
use crate::data::linear_algebra::decomposition::triangular_solve::{back_substitute, Diagonal, forward_substitute};
use crate::data::linear_algebra::EPSILON;
use crate::data::linear_algebra::matrix::Matrix;
use crate::error::Error;

pub mod permutation;
pub(crate) mod triangular_solve;

/// Factors `L`, `U` and `P` with `PA = LU`.
#[derive(Clone, Debug, PartialEq)]
pub struct LowerUpper {
    /// Unit lower triangular, `m x m`.
    lower: Matrix,
    /// Upper triangular (in the echelon sense when `A` is not square), `m x n`.
    upper: Matrix,
    /// Row `i` of `PA` is row `row_permutation.forward(i)` of `A`.
    row_permutation: FullPermutation,
    /// Elimination steps `k` at which the largest candidate pivot was smaller than `EPSILON`.
    ///
    /// Nothing was eliminated in those columns.
    degenerate_pivots: Vec<usize>,
}

/// How the row permutation should be returned by `Matrix::get_lupp`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PermutationFormat {
    /// An explicit `m x m` permutation matrix.
    Matrix,
    /// The compact index form, see `FullPermutation`.
    Vector,
}

/// A row permutation in the format requested by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum PermutationRepresentation {
    /// `P` with `P[i][p(i)] == 1`.
    Matrix(Matrix),
    /// Row `i` of `PA` is row `p[i]` of `A`.
    Vector(FullPermutation),
}

impl LowerUpper {
    /// Decompose a matrix.
    ///
    /// At step `k`, the row with the largest absolute value in column `k` among the rows `k..m`
    /// is swapped into position `k`. Ties go to the lowest row index. If even that value is
    /// smaller than `EPSILON`, the step is recorded as degenerate and the column is left as it is.
    #[must_use]
    pub fn decompose(matrix: &Matrix) -> Self {
        let (m, n) = matrix.dim();

        let mut lower = Matrix::identity(m);
        let mut upper = matrix.clone();
        let mut row_permutation = FullPermutation::identity(m);
        let mut degenerate_pivots = Vec::new();

        for k in 0..m.min(n) {
            let pivot_row = (k..m).rev()
                .max_by(|&i, &j| upper[(i, k)].abs().total_cmp(&upper[(j, k)].abs()))
                .unwrap_or(k);

            if upper[(pivot_row, k)].abs() < EPSILON {
                trace!("Degenerate pivot in column {k}");
                degenerate_pivots.push(k);
                for i in k..m {
                    upper[(i, k)] = f64::zero();
                }
                continue;
            }

            if pivot_row != k {
                swap_rows(&mut upper, &mut lower, &mut row_permutation, k, pivot_row);
            }

            let pivot_value = upper[(k, k)];
            for i in (k + 1)..m {
                let ratio = upper[(i, k)] / pivot_value;
                if ratio.is_zero() {
                    continue;
                }

                lower[(i, k)] = ratio;
                upper[(i, k)] = f64::zero();
                for j in (k + 1)..n {
                    let subtracted = ratio * upper[(k, j)];
                    upper[(i, j)] -= subtracted;
                }
            }
        }

        Self { lower, upper, row_permutation, degenerate_pivots }
    }

    /// Unit lower triangular factor.
    pub fn lower(&self) -> &Matrix {
        &self.lower
    }

    /// Upper triangular factor.
    pub fn upper(&self) -> &Matrix {
        &self.upper
    }

    /// Row permutation.
    pub fn row_permutation(&self) -> &FullPermutation {
        &self.row_permutation
    }

    /// Steps of the elimination at which no usable pivot was found.
    pub fn degenerate_pivots(&self) -> &[usize] {
        &self.degenerate_pivots
    }

    /// Whether a square matrix with this decomposition can't be inverted.
    pub fn is_singular(&self) -> bool {
        !self.upper.is_square() || !self.degenerate_pivots.is_empty()
    }

    /// Determinant of the decomposed matrix, if it is square.
    ///
    /// Product of the diagonal of `U`, negated when the permutation is odd.
    pub fn determinant(&self) -> Option<f64> {
        if !self.upper.is_square() {
            return None;
        }

        let product = (0..self.upper.nr_rows())
            .map(|i| self.upper[(i, i)])
            .product::<f64>();
        Some(if self.row_permutation.is_even() { product } else { -product })
    }

    /// Solve `Ax = b` in place using the factors.
    ///
    /// # Errors
    ///
    /// `SingularMatrix` when a pivot is too small.
    pub fn solve_in_place(&self, b: &mut Vec<f64>) -> Result<(), Error> {
        debug_assert_eq!(b.len(), self.lower.nr_rows());

        if self.is_singular() {
            return Err(Error::SingularMatrix);
        }

        *b = self.row_permutation.gather(b);
        forward_substitute(&self.lower, Diagonal::Unit, b)?;
        back_substitute(&self.upper, Diagonal::Stored, b)
    }
}

/// Exchange rows `k` and `pivot_row` in the partially computed factors.
///
/// Only the multipliers left of the diagonal in `lower` belong to the rows, the diagonal itself
/// stays in place.
fn swap_rows(
    upper: &mut Matrix,
    lower: &mut Matrix,
    row_permutation: &mut FullPermutation,
    k: usize,
    pivot_row: usize,
) {
    debug_assert!(k < pivot_row);

    for j in 0..upper.nr_columns() {
        let (top, bottom) = (upper[(k, j)], upper[(pivot_row, j)]);
        upper[(k, j)] = bottom;
        upper[(pivot_row, j)] = top;
    }
    for j in 0..k {
        let (top, bottom) = (lower[(k, j)], lower[(pivot_row, j)]);
        lower[(k, j)] = bottom;
        lower[(pivot_row, j)] = top;
    }
    row_permutation.swap(k, pivot_row);
}

impl Matrix {
    /// The LU decomposition of this matrix, computed on first use.
    pub fn lower_upper(&self) -> &LowerUpper {
        self.cache().lower_upper.get_or_init(|| Box::new(LowerUpper::decompose(self)))
    }

    /// Copies of `L`, `U` and `P` with `PA = LU`.
    ///
    /// The decomposition completes also for singular matrices, degenerate pivots are available
    /// through `lower_upper`.
    #[must_use]
    pub fn get_lupp(&self, format: PermutationFormat) -> (Self, Self, PermutationRepresentation) {
        let lower_upper = self.lower_upper();
        let permutation = match format {
            PermutationFormat::Matrix => PermutationRepresentation::Matrix(lower_upper.row_permutation.matrix()),
            PermutationFormat::Vector => PermutationRepresentation::Vector(lower_upper.row_permutation.clone()),
        };

        (lower_upper.lower.clone(), lower_upper.upper.clone(), permutation)
    }

    /// Determinant of a square matrix, computed on first use.
    ///
    /// # Errors
    ///
    /// If the matrix is not square.
    pub fn determinant(&self) -> Result<f64, Error> {
        if let Some(&determinant) = self.cache().determinant.get() {
            return Ok(determinant);
        }

        let determinant = self.lower_upper().determinant().ok_or(Error::Dimension {
            operation: "determinant",
            left: self.dim(),
            right: (self.nr_rows(), self.nr_rows()),
        })?;

        Ok(*self.cache().determinant.get_or_init(|| determinant))
    }
}
