//! # Inversion and solving
//!
//! Inverses are computed from the cached LU decomposition, except for matrices whose shape allows
//! a shortcut. The column update replaces a single column of a matrix whose inverse is known at
//! the cost of a matrix-vector product.
use log::trace;
use num_traits::{One, Zero};

use crate::data::linear_algebra::decomposition::triangular_solve::{back_substitute, Diagonal, forward_substitute};
use crate::data::linear_algebra::EPSILON;
use crate::data::linear_algebra::matrix::Matrix;
use crate::error::Error;

/// Shapes of square matrices that can be inverted without elimination.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatrixType {
    /// No special structure.
    General,
    /// All values below the diagonal are zero.
    UpperTriangular,
    /// All values above the diagonal are zero.
    LowerTriangular,
    /// Exactly one `1` in every row and every column, zero elsewhere.
    Permutation,
}

impl Matrix {
    /// Detect the most specific `MatrixType` of a square matrix.
    ///
    /// Values within `EPSILON` of zero or one count as such.
    pub fn matrix_type(&self) -> MatrixType {
        [MatrixType::Permutation, MatrixType::UpperTriangular, MatrixType::LowerTriangular]
            .into_iter()
            .find(|&matrix_type| self.has_type(matrix_type))
            .unwrap_or(MatrixType::General)
    }

    /// Whether this matrix has the given shape, within `EPSILON`.
    ///
    /// Every matrix is `General`. The other shapes require a square matrix.
    pub fn has_type(&self, matrix_type: MatrixType) -> bool {
        if matrix_type == MatrixType::General {
            return true;
        }
        if !self.is_square() {
            return false;
        }

        let n = self.nr_rows();
        let is_zero = |i: usize, j: usize| self[(i, j)].abs() < EPSILON;
        let is_one = |i: usize, j: usize| (self[(i, j)] - 1f64).abs() < EPSILON;

        match matrix_type {
            MatrixType::General => true,
            MatrixType::UpperTriangular => (0..n).all(|i| (0..i).all(|j| is_zero(i, j))),
            MatrixType::LowerTriangular => (0..n).all(|i| ((i + 1)..n).all(|j| is_zero(i, j))),
            MatrixType::Permutation => (0..n).all(|i| {
                (0..n).filter(|&j| is_one(i, j)).count() == 1
                    && (0..n).filter(|&j| is_one(j, i)).count() == 1
                    && (0..n).all(|j| is_one(i, j) || is_zero(i, j))
            }),
        }
    }

    /// The inverse of this matrix, computed on first use.
    ///
    /// # Errors
    ///
    /// A `Dimension` error if the matrix is not square, `SingularMatrix` if it is singular within
    /// tolerance.
    pub fn inverse(&self) -> Result<&Self, Error> {
        if let Some(inverse) = self.cache().inverse.get() {
            return Ok(&**inverse);
        }

        self.inverse_with_type(self.matrix_type())
    }

    /// The inverse of this matrix, using a known shape to pick the method.
    ///
    /// The shape is checked first. A matrix that doesn't have it is inverted as `General`, so
    /// the cached inverse is always the inverse of the whole matrix.
    ///
    /// # Errors
    ///
    /// A `Dimension` error if the matrix is not square, `SingularMatrix` if it is singular within
    /// tolerance.
    pub fn inverse_with_type(&self, matrix_type: MatrixType) -> Result<&Self, Error> {
        if let Some(inverse) = self.cache().inverse.get() {
            return Ok(&**inverse);
        }
        if !self.is_square() {
            return Err(Error::Dimension {
                operation: "inverse",
                left: self.dim(),
                right: (self.nr_rows(), self.nr_rows()),
            });
        }

        let matrix_type = if self.has_type(matrix_type) {
            matrix_type
        } else {
            trace!("Matrix doesn't have shape {matrix_type:?}, inverting it as General");
            MatrixType::General
        };
        trace!("Inverting a {}x{} matrix as {:?}", self.nr_rows(), self.nr_columns(), matrix_type);
        let inverse = match matrix_type {
            MatrixType::Permutation => self.transposed(),
            MatrixType::UpperTriangular => self.inverse_by_columns(|column| {
                back_substitute(self, Diagonal::Stored, column)
            })?,
            MatrixType::LowerTriangular => self.inverse_by_columns(|column| {
                forward_substitute(self, Diagonal::Stored, column)
            })?,
            MatrixType::General => {
                let lower_upper = self.lower_upper();
                self.inverse_by_columns(|column| lower_upper.solve_in_place(column))?
            },
        };

        Ok(&**self.cache().inverse.get_or_init(|| Box::new(inverse)))
    }

    /// Solve `AX = I` one unit column at a time.
    fn inverse_by_columns(
        &self,
        mut solve: impl FnMut(&mut Vec<f64>) -> Result<(), Error>,
    ) -> Result<Self, Error> {
        let n = self.nr_rows();

        let mut inverse = Self::square(n);
        for j in 0..n {
            let mut column = vec![f64::zero(); n];
            column[j] = f64::one();
            solve(&mut column)?;
            for (i, value) in column.into_iter().enumerate() {
                inverse[(i, j)] = value;
            }
        }

        Ok(inverse)
    }

    /// The inverse of this matrix after replacing column `index` by `new_column`.
    ///
    /// Uses (and if needed computes) the inverse of the current matrix, after which the update
    /// costs `O(n^2)`.
    ///
    /// # Errors
    ///
    /// If the shapes don't match, the index is out of range, or either matrix is singular.
    pub fn inverse_with_column(&self, new_column: &Self, index: usize) -> Result<Self, Error> {
        inverse_with_column(self.inverse()?, new_column, index)
    }

    /// Solve `Ax = b` for each column `b` of the right-hand side.
    ///
    /// A `1 x n` right-hand side is read as a single column. No inverse is computed.
    ///
    /// # Errors
    ///
    /// A `Dimension` error for incompatible shapes and `SingularMatrix` if the matrix is singular
    /// within tolerance.
    pub fn solve(&self, b: &Self) -> Result<Self, Error> {
        let n = self.nr_rows();
        let right_hand_side = if b.nr_rows() == n {
            b.clone()
        } else if b.nr_rows() == 1 && b.nr_columns() == n {
            b.transposed()
        } else {
            return Err(Error::Dimension { operation: "solve", left: self.dim(), right: b.dim() });
        };
        if !self.is_square() {
            return Err(Error::Dimension { operation: "solve", left: self.dim(), right: b.dim() });
        }

        let lower_upper = self.lower_upper();
        let mut solution = Self::new(n, right_hand_side.nr_columns());
        for j in 0..right_hand_side.nr_columns() {
            let mut column = right_hand_side.column_iter(j).collect();
            lower_upper.solve_in_place(&mut column)?;
            for (i, value) in column.into_iter().enumerate() {
                solution[(i, j)] = value;
            }
        }

        Ok(solution)
    }

    /// Number of linearly independent rows (equivalently, columns).
    ///
    /// Computed by reducing a copy of the rows to row echelon form, skipping columns without a
    /// pivot larger than `EPSILON`.
    pub fn rank(&self) -> usize {
        let (m, n) = self.dim();
        let mut rows = (0..m).map(|i| self.row_slice(i).to_vec()).collect::<Vec<_>>();

        let mut rank = 0;
        for j in 0..n {
            if rank == m {
                break;
            }

            let pivot_row = (rank..m).rev()
                .max_by(|&a, &b| rows[a][j].abs().total_cmp(&rows[b][j].abs()))
                .unwrap_or(rank);
            if rows[pivot_row][j].abs() < EPSILON {
                continue;
            }

            rows.swap(pivot_row, rank);
            let (done, rest) = rows.split_at_mut(rank + 1);
            let pivot = &done[rank];
            for row in rest {
                let ratio = row[j] / pivot[j];
                for k in j..n {
                    row[k] -= ratio * pivot[k];
                }
            }
            rank += 1;
        }

        rank
    }

    /// Whether the rows are linearly independent, that is, the rank equals the number of rows.
    pub fn rows_linearly_independent(&self) -> bool {
        self.rank() == self.nr_rows()
    }

    /// Whether the columns are linearly independent, that is, the rank equals the number of
    /// columns.
    pub fn columns_linearly_independent(&self) -> bool {
        self.rank() == self.nr_columns()
    }
}

/// Compute the inverse of `B'`, where `B'` equals `B` except for column `index`, which is
/// `new_column`.
///
/// # Arguments
///
/// * `old_inverse`: The inverse of `B`, `n x n`.
/// * `new_column`: Either `n x 1` or `1 x n`.
/// * `index`: Column of `B` that is replaced.
///
/// # Errors
///
/// A `Dimension` or `Index` error for inconsistent arguments and `SingularMatrix` if `B'` is
/// singular within tolerance.
pub fn inverse_with_column(old_inverse: &Matrix, new_column: &Matrix, index: usize) -> Result<Matrix, Error> {
    let n = old_inverse.nr_rows();
    if !old_inverse.is_square() || new_column.len() != n || (new_column.nr_rows() != 1 && new_column.nr_columns() != 1) {
        return Err(Error::Dimension {
            operation: "inverse with column",
            left: old_inverse.dim(),
            right: new_column.dim(),
        });
    }
    if index >= n {
        return Err(Error::Index { row: 0, column: index, nr_rows: n, nr_columns: n });
    }

    let transformed = multiply_vector(old_inverse, new_column.values());
    inverse_with_transformed_column(old_inverse, &transformed, index)
}

/// Update an inverse given the new column already multiplied with the old inverse.
///
/// With `d = B^-1 a`, row `index` of the new inverse is row `index` of the old one divided by
/// `d[index]`, and every other row `i` has `d[i]` times that new row subtracted.
///
/// # Errors
///
/// `SingularMatrix` if `d[index]` is smaller than `EPSILON` in absolute value.
pub(crate) fn inverse_with_transformed_column(
    old_inverse: &Matrix,
    transformed: &[f64],
    index: usize,
) -> Result<Matrix, Error> {
    debug_assert_eq!(transformed.len(), old_inverse.nr_rows());

    let pivot = transformed[index];
    if pivot.abs() < EPSILON {
        return Err(Error::SingularMatrix);
    }

    let mut inverse = old_inverse.clone();
    let pivot_row = old_inverse.row_slice(index).iter().map(|v| v / pivot).collect::<Vec<_>>();
    for (i, &factor) in transformed.iter().enumerate() {
        if i == index {
            inverse.row_slice_mut(i).copy_from_slice(&pivot_row);
        } else if !factor.is_zero() {
            for (value, pivot_value) in inverse.row_slice_mut(i).iter_mut().zip(&pivot_row) {
                *value -= factor * pivot_value;
            }
        }
    }

    Ok(inverse)
}

/// `Ax` for a slice `x` of length `A.nr_columns()`.
pub(crate) fn multiply_vector(matrix: &Matrix, vector: &[f64]) -> Vec<f64> {
    debug_assert_eq!(matrix.nr_columns(), vector.len());

    (0..matrix.nr_rows())
        .map(|i| matrix.row_slice(i).iter().zip(vector).map(|(a, x)| a * x).sum())
        .collect()
}
